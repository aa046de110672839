use crate::model::{Schedule, Staff};
use crate::roster::RosterSnapshot;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Objet transmis au collaborateur de persistance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Record {
    Staff(Staff),
    Schedule(Schedule),
    Roster(RosterSnapshot),
}

/// Collaborateur transactionnel : `commit` est atomique, `rollback` annule
/// tout ce qui a été ajouté depuis le dernier commit.
pub trait Persistence {
    fn add(&mut self, record: Record) -> anyhow::Result<()>;
    fn commit(&mut self) -> anyhow::Result<()>;
    fn rollback(&mut self);
}

/// Contenu complet d'un stockage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub records: Vec<Record>,
}

impl StoreSnapshot {
    pub fn staff(&self) -> impl Iterator<Item = &Staff> {
        self.records.iter().filter_map(|r| match r {
            Record::Staff(s) => Some(s),
            _ => None,
        })
    }

    pub fn schedules(&self) -> impl Iterator<Item = &Schedule> {
        self.records.iter().filter_map(|r| match r {
            Record::Schedule(s) => Some(s),
            _ => None,
        })
    }

    pub fn rosters(&self) -> impl Iterator<Item = &RosterSnapshot> {
        self.records.iter().filter_map(|r| match r {
            Record::Roster(r) => Some(r),
            _ => None,
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    pending: Vec<Record>,
    committed: Vec<Record>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[Record] {
        &self.pending
    }

    pub fn committed(&self) -> &[Record] {
        &self.committed
    }
}

impl Persistence for MemoryStore {
    fn add(&mut self, record: Record) -> anyhow::Result<()> {
        self.pending.push(record);
        Ok(())
    }

    fn commit(&mut self) -> anyhow::Result<()> {
        self.committed.append(&mut self.pending);
        Ok(())
    }

    fn rollback(&mut self) {
        self.pending.clear();
    }
}

/// Stockage fichier JSON ; chaque commit réécrit le fichier de manière atomique.
pub struct JsonStorage {
    path: PathBuf,
    pending: Vec<Record>,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            pending: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Charge le contenu commité ; un fichier absent vaut un stockage vide.
    pub fn load(&self) -> anyhow::Result<StoreSnapshot> {
        if !self.path.exists() {
            return Ok(StoreSnapshot::default());
        }
        let data = fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let snapshot: StoreSnapshot = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(snapshot)
    }

    fn save(&self, snapshot: &StoreSnapshot) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}

impl Persistence for JsonStorage {
    fn add(&mut self, record: Record) -> anyhow::Result<()> {
        self.pending.push(record);
        Ok(())
    }

    fn commit(&mut self) -> anyhow::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let mut snapshot = self.load()?;
        snapshot.records.extend(self.pending.iter().cloned());
        self.save(&snapshot)?;
        self.pending.clear();
        Ok(())
    }

    fn rollback(&mut self) {
        self.pending.clear();
    }
}
