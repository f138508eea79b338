/*! Writing facilities

The intermediate file is written through [IntermediateSink], which cleans and appends segments batch by batch.
!*/
mod intermediate;

pub use intermediate::IntermediateSink;
