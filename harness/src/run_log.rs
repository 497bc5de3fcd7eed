use std::{
    fs::{File, OpenOptions},
    path::Path,
};

use chrono::{Datelike, Timelike};

use crate::{config::Mode, error::RunLogError};

/// `uq_<mode>_<Y>-<M>-<D>_<h>:<m>:<s>_c<C>_n<N>.log`, numbers not zero-padded.
pub fn file_name<T>(mode: Mode, at: &T, concurrency: usize, count: usize) -> String
where
    T: Datelike + Timelike,
{
    format!(
        "uq_{}_{}-{}-{}_{}:{}:{}_c{}_n{}.log",
        mode,
        at.year(),
        at.month(),
        at.day(),
        at.hour(),
        at.minute(),
        at.second(),
        concurrency,
        count
    )
}

/// Opens the run log read-write, creating it if needed. Existing content is kept.
pub fn open(dir: &Path, name: &str) -> Result<File, RunLogError> {
    let path = dir.join(name);
    OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(&path)
        .map_err(|source| RunLogError::Open { path, source })
}
