/*! Offline processing

Operations on intermediate files that are not part of the two main passes.
!*/
pub mod sample;
