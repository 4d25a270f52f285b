use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

/// Supplies the current state of a project.
///
/// `None` from any method means the project hasn't been restored yet, which is not an error.
#[async_trait::async_trait]
pub trait ProjectDataSource: Send + Sync {
	/// The currently declared dependencies.
	async fn project_spec(&self) -> crate::Result<Option<ProjectSpec>>;
	/// Recency of the snapshot [`read_snapshot()`](Self::read_snapshot) would return.
	async fn snapshot_stamp(&self) -> crate::Result<Option<SnapshotStamp>>;
	/// Reads the resolved graph, potentially slow.
	async fn read_snapshot(&self) -> crate::Result<Option<GraphSnapshot>>;
}

/// A project stored as two JSON files, the declarations and the snapshot written by a restore.
///
/// The snapshot's modification time is used as its stamp.
#[derive(Debug, Clone)]
pub struct FileDataSource {
	spec_path: PathBuf,
	snapshot_path: PathBuf,
}

impl FileDataSource {
	pub fn new(spec_path: impl Into<PathBuf>, snapshot_path: impl Into<PathBuf>) -> Self {
		Self { spec_path: spec_path.into(), snapshot_path: snapshot_path.into() }
	}

	pub fn spec_path(&self) -> &std::path::Path {
		&self.spec_path
	}

	pub fn snapshot_path(&self) -> &std::path::Path {
		&self.snapshot_path
	}
}

/// Reads and parses a JSON file on the blocking pool, a missing file is `None`.
async fn read_json_file<T>(path: PathBuf) -> crate::Result<Option<T>>
where T: serde::de::DeserializeOwned + Send + 'static
{
	tokio::task::spawn_blocking(move || -> crate::Result<Option<T>> {
		let file = match std::fs::File::open(&path) {
			Ok(f) => f,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				log::debug!("{} doesn't exist yet", path.display());
				return Ok(None)
			},
			Err(e) => return Err(e.into()),
		};
		let value = serde_json::from_reader(std::io::BufReader::new(file))?;
		Ok(Some(value))
	}).await?
}

#[async_trait::async_trait]
impl ProjectDataSource for FileDataSource {
	async fn project_spec(&self) -> crate::Result<Option<ProjectSpec>> {
		read_json_file(self.spec_path.clone()).await
	}

	async fn snapshot_stamp(&self) -> crate::Result<Option<SnapshotStamp>> {
		match tokio::fs::metadata(&self.snapshot_path).await {
			Ok(meta) => Ok(Some(SnapshotStamp::Modified(meta.modified()?))),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
			Err(e) => Err(e.into()),
		}
	}

	async fn read_snapshot(&self) -> crate::Result<Option<GraphSnapshot>> {
		log::trace!("Reading graph snapshot from {}", self.snapshot_path.display());
		read_json_file(self.snapshot_path.clone()).await
	}
}

#[derive(Debug, Default)]
struct MemoryState {
	spec: Option<ProjectSpec>,
	snapshot: Option<GraphSnapshot>,
	generation: u64,
}

/// A project held in memory.
///
/// Every snapshot replacement bumps a generation counter which serves as the stamp.
#[derive(Debug, Default)]
pub struct MemoryDataSource {
	state: parking_lot::Mutex<MemoryState>,
	snapshot_reads: AtomicUsize,
}

impl MemoryDataSource {
	pub fn new(spec: ProjectSpec, snapshot: GraphSnapshot) -> Self {
		Self {
			state: parking_lot::Mutex::new(MemoryState { spec: Some(spec), snapshot: Some(snapshot), generation: 1 }),
			snapshot_reads: AtomicUsize::new(0),
		}
	}

	/// A project that has declarations but has never been restored.
	pub fn unrestored(spec: ProjectSpec) -> Self {
		Self {
			state: parking_lot::Mutex::new(MemoryState { spec: Some(spec), snapshot: None, generation: 0 }),
			snapshot_reads: AtomicUsize::new(0),
		}
	}

	/// Replaces the declarations, the snapshot stamp is left alone.
	pub fn set_spec(&self, spec: ProjectSpec) {
		self.state.lock().spec = Some(spec);
	}

	pub fn set_snapshot(&self, snapshot: GraphSnapshot) {
		let mut state = self.state.lock();
		state.snapshot = Some(snapshot);
		state.generation += 1;
	}

	/// Bumps the stamp without changing the snapshot, as if it was rewritten with the same content.
	pub fn touch(&self) {
		self.state.lock().generation += 1;
	}

	pub fn clear_snapshot(&self) {
		let mut state = self.state.lock();
		state.snapshot = None;
		state.generation += 1;
	}

	/// How many times the snapshot has been read.
	pub fn snapshot_reads(&self) -> usize {
		self.snapshot_reads.load(Ordering::SeqCst)
	}
}

#[async_trait::async_trait]
impl ProjectDataSource for MemoryDataSource {
	async fn project_spec(&self) -> crate::Result<Option<ProjectSpec>> {
		Ok(self.state.lock().spec.clone())
	}

	async fn snapshot_stamp(&self) -> crate::Result<Option<SnapshotStamp>> {
		let state = self.state.lock();
		Ok(state.snapshot.as_ref().map(|_| SnapshotStamp::Generation(state.generation)))
	}

	async fn read_snapshot(&self) -> crate::Result<Option<GraphSnapshot>> {
		self.snapshot_reads.fetch_add(1, Ordering::SeqCst);
		Ok(self.state.lock().snapshot.clone())
	}
}
