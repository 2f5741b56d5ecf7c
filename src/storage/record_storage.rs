use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{anyhow, Result};
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
};
use tracing::{debug, warn};

use super::entities::CreationRecordEntity;

/// Name of the file records are kept in.
pub const RECORDS_FILE: &str = "records.jsonl";

/// Interface for abstracting the source of records. Charts only ever need a snapshot of all of
/// them.
pub trait RecordSource {
    /// Retrieves every record currently stored.
    fn query_all(&self) -> impl Future<Output = Result<Vec<CreationRecordEntity>>> + Send;
}

impl<T: Deref> RecordSource for T
where
    T::Target: RecordSource,
{
    fn query_all(&self) -> impl Future<Output = Result<Vec<CreationRecordEntity>>> + Send {
        self.deref().query_all()
    }
}

/// The main realization of [RecordSource]. Records are appended as json lines into a single
/// file.
pub struct RecordStorageImpl {
    path: PathBuf,
}

impl RecordStorageImpl {
    pub fn new(record_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&record_dir)?;

        Ok(Self {
            path: record_dir.join(RECORDS_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Adds a record at the end of the file.
    pub async fn append(&self, record: &CreationRecordEntity) -> Result<()> {
        let mut buffer = serde_json::to_vec(record)?;
        buffer.push(b'\n');

        let mut file = File::options()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = async {
            file.write_all(&buffer).await?;
            file.flush().await
        }
        .await;
        file.unlock_async().await?;
        result?;
        debug!("Appended record created at {}", record.created_at);
        Ok(())
    }

    async fn get_all_inner(path: &Path) -> Result<Vec<CreationRecordEntity>> {
        async fn extract(
            path: &Path,
        ) -> std::result::Result<Vec<CreationRecordEntity>, std::io::Error> {
            debug!("Extracting {path:?}");
            let mut file = File::open(path).await?;
            file.lock_shared()?;
            let buffer = BufReader::new(&mut file);
            let mut lines = buffer.split(b'\n');
            let mut records = vec![];
            while let Some(v) = lines.next_segment().await? {
                if v.trim_ascii().is_empty() {
                    continue;
                }
                match serde_json::from_slice::<CreationRecordEntity>(&v) {
                    Ok(v) => records.push(v),
                    Err(e) => {
                        // ignore illegal values. Might happen after an interrupted write
                        warn!(
                            "During parsing in path {:?} found illegal json string {}:  {e}",
                            path,
                            String::from_utf8_lossy(&v)
                        )
                    }
                }
            }

            drop(lines);
            file.unlock_async().await?;

            Ok(records)
        }

        match extract(path).await {
            Ok(s) => Ok(s),
            Err(e) => {
                if e.kind() == ErrorKind::NotFound {
                    Ok(vec![])
                } else {
                    Err(e)?
                }
            }
        }
    }
}

impl RecordSource for RecordStorageImpl {
    async fn query_all(&self) -> Result<Vec<CreationRecordEntity>> {
        Self::get_all_inner(&self.path).await
    }
}

/// Keeps records in memory. Useful when records come from somewhere other than the record file.
#[derive(Default)]
pub struct MemoryRecordSource {
    records: Mutex<Vec<CreationRecordEntity>>,
}

impl MemoryRecordSource {
    pub fn new(records: Vec<CreationRecordEntity>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn push(&self, record: CreationRecordEntity) -> Result<()> {
        self.records
            .lock()
            .map_err(|_| anyhow!("Record source lock was poisoned"))?
            .push(record);
        Ok(())
    }
}

impl RecordSource for MemoryRecordSource {
    async fn query_all(&self) -> Result<Vec<CreationRecordEntity>> {
        Ok(self
            .records
            .lock()
            .map_err(|_| anyhow!("Record source lock was poisoned"))?
            .clone())
    }
}
