/*! Random sampling

Extracts `n` random lines of an intermediate file, to inspect cleaning or tokenization on a manageable subset.

Lines are picked among the first `limit` lines (the whole file by default), with a seeded RNG
so that a sample can be reproduced. Selected lines are trimmed and appended to the destination file
in their source order.
!*/
use std::{
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::Path,
};

use log::info;
use rand::{rngs::StdRng, seq::index, SeedableRng};

use crate::{error::Error, io::LineSource};

/// Counts the lines of `path`.
pub fn count_lines(path: &Path) -> Result<usize, Error> {
    let mut count = 0;
    for line in LineSource::open(path)? {
        line?;
        count += 1;
    }
    Ok(count)
}

/// Draws `n` distinct 1-based line numbers in `1..=limit`, sorted.
pub fn random_indices(limit: usize, n: usize, seed: u64) -> Result<Vec<usize>, Error> {
    if n > limit {
        return Err(Error::Custom(format!(
            "cannot sample {} lines out of {}",
            n, limit
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = index::sample(&mut rng, limit, n)
        .into_iter()
        .map(|i| i + 1)
        .collect();
    indices.sort_unstable();
    Ok(indices)
}

/// Appends the (trimmed) lines whose 1-based numbers are in `indices` to `dst`.
///
/// `indices` must be sorted. Returns the number of written lines.
pub fn extract_lines(src: &Path, dst: &Path, indices: &[usize]) -> Result<usize, Error> {
    let f = OpenOptions::new()
        .append(true)
        .create(true)
        .open(dst)
        .map_err(|e| Error::io(dst, e))?;
    let mut w = BufWriter::new(f);

    let mut wanted = indices.iter().peekable();
    let mut written = 0;
    for (idx, line) in LineSource::open(src)?.enumerate() {
        let line = line?;
        match wanted.peek() {
            Some(&&next) if next == idx + 1 => {
                writeln!(w, "{}", line.trim()).map_err(|e| Error::io(dst, e))?;
                written += 1;
                wanted.next();
            }
            Some(_) => (),
            None => break,
        }
    }
    w.flush().map_err(|e| Error::io(dst, e))?;
    Ok(written)
}

/// Samples `n` lines of `src` among the first `limit` ones into `dst`.
pub fn sample(
    src: &Path,
    dst: &Path,
    n: usize,
    limit: Option<usize>,
    seed: u64,
) -> Result<usize, Error> {
    let limit = match limit {
        Some(l) => l,
        None => count_lines(src)?,
    };
    let indices = random_indices(limit, n, seed)?;
    let written = extract_lines(src, dst, &indices)?;
    info!(
        "sampled {} lines out of {} from {:?} into {:?}",
        written, limit, src, dst
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn indices() {
        let idx = random_indices(100, 10, 42).unwrap();
        assert_eq!(idx.len(), 10);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
        assert!(idx.iter().all(|&i| (1..=100).contains(&i)));

        // reproducible
        assert_eq!(idx, random_indices(100, 10, 42).unwrap());
    }

    #[test]
    fn too_many() {
        assert!(random_indices(3, 4, 0).is_err());
        assert_eq!(random_indices(3, 3, 0).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn extract() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("segments.txt");
        let dst = dir.path().join("sample.txt");
        fs::write(&src, "one\n  two \nthree\nfour\n").unwrap();

        assert_eq!(count_lines(&src).unwrap(), 4);
        assert_eq!(extract_lines(&src, &dst, &[2, 4]).unwrap(), 2);
        assert_eq!(fs::read_to_string(&dst).unwrap(), "two\nfour\n");
    }

    #[test]
    fn whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("segments.txt");
        let dst = dir.path().join("sample.txt");
        fs::write(&src, "a\nb\nc\n").unwrap();

        assert_eq!(sample(&src, &dst, 3, None, 7).unwrap(), 3);
        assert_eq!(fs::read_to_string(&dst).unwrap(), "a\nb\nc\n");
    }
}
