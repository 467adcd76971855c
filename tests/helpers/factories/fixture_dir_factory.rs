use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// Writes tagged-line fixture files (`<collection>\t<payload>` per record)
/// into a fresh temporary directory.
pub struct FixtureDirFactory {
    base: String,
    extension: String,
    collection: String,
    files: Vec<(u64, usize)>,
    extra: Vec<(String, String)>,
}

pub struct FixtureDir {
    pub dir: TempDir,
    pub inputs: Vec<PathBuf>,
}

impl FixtureDir {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl FixtureDirFactory {
    pub fn new() -> Self {
        Self {
            base: "sample".to_string(),
            extension: "root".to_string(),
            collection: "Events".to_string(),
            files: Vec::new(),
            extra: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: &str) -> Self {
        self.base = base.to_string();
        self
    }

    pub fn with_collection(mut self, collection: &str) -> Self {
        self.collection = collection.to_string();
        self
    }

    /// Adds `<base>_<index>.<ext>` holding `records` entries.
    pub fn with_file(mut self, index: u64, records: usize) -> Self {
        self.files.push((index, records));
        self
    }

    pub fn with_record_counts(mut self, counts: &[usize]) -> Self {
        for (i, &records) in counts.iter().enumerate() {
            self.files.push((i as u64 + 1, records));
        }
        self
    }

    /// Adds an arbitrary file with literal contents.
    pub fn with_raw(mut self, name: &str, contents: &str) -> Self {
        self.extra.push((name.to_string(), contents.to_string()));
        self
    }

    pub fn create(self) -> FixtureDir {
        let dir = tempdir().unwrap();
        let mut inputs = Vec::new();

        for (index, records) in &self.files {
            let path = dir
                .path()
                .join(format!("{}_{}.{}", self.base, index, self.extension));
            fs::write(&path, tagged_lines(&self.collection, *index, *records)).unwrap();
            inputs.push(path);
        }

        for (name, contents) in &self.extra {
            fs::write(dir.path().join(name), contents).unwrap();
        }

        FixtureDir { dir, inputs }
    }
}

pub fn tagged_lines(collection: &str, file_index: u64, records: usize) -> String {
    let mut out = String::new();
    for i in 0..records {
        out.push_str(&format!("{}\tfile={} entry={}\n", collection, file_index, i));
    }
    out
}
