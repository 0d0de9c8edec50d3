use super::Error;
use rand_o_tron::session::Session;
use rand_o_tron::store::{FileStore, Store};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
pub struct Common {
    /// File the state is persisted in
    #[structopt(long, default_value = "rand-o-tron.state")]
    pub state_file: PathBuf,
}

impl Common {
    pub fn open_session(&self) -> Result<Session<FileStore>, Error> {
        Ok(Session::open(FileStore::new(&self.state_file))?)
    }

    /// Keep a copy of the current blob so the command can be undone with
    /// `rollback`.
    pub fn backup(&self) -> Result<(), Error> {
        let current = FileStore::new(&self.state_file).read()?;
        let mut backup = FileStore::new(self.backup_path());
        backup.write(&current)?;
        Ok(())
    }

    pub fn restore_backup(&self) -> Result<(), Error> {
        let backup = FileStore::new(self.backup_path()).read()?;
        let mut store = FileStore::new(&self.state_file);
        store.write(&backup)?;
        Ok(())
    }

    fn backup_path(&self) -> PathBuf {
        let mut path = self.state_file.clone().into_os_string();
        path.push(".backup");
        PathBuf::from(path)
    }
}
