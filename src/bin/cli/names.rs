use super::common::Common;
use super::Error;
use itertools::Itertools;
use rand_o_tron::state::Selection;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Add {
    #[structopt(flatten)]
    common: Common,

    /// Names to register
    #[structopt(required = true)]
    names: Vec<String>,
}

impl Add {
    pub fn exec(self) -> Result<(), Error> {
        let Add { common, names } = self;
        common.backup()?;

        let mut session = common.open_session()?;
        // blank input is not a participant
        for name in names.iter().filter(|name| !name.trim().is_empty()) {
            session.register_new_name(name)?;
        }
        Ok(())
    }
}

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Merge {
    #[structopt(flatten)]
    common: Common,

    /// Name the merged participants survive as
    #[structopt(long)]
    into: String,

    /// Names to merge away
    #[structopt(required = true)]
    names: Vec<String>,
}

impl Merge {
    pub fn exec(self) -> Result<(), Error> {
        let Merge {
            common,
            into,
            names,
        } = self;
        common.backup()?;

        let mut session = common.open_session()?;
        session.merge(&names.iter().cloned().collect::<Selection>(), &into)?;

        println!("merged {} into {}", names.iter().join(", "), into);
        Ok(())
    }
}

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Delete {
    #[structopt(flatten)]
    common: Common,

    /// Names to remove
    #[structopt(required = true)]
    names: Vec<String>,
}

impl Delete {
    pub fn exec(self) -> Result<(), Error> {
        let Delete { common, names } = self;
        common.backup()?;

        let mut session = common.open_session()?;
        session.set_selection(names.iter().cloned().collect::<Selection>());
        session.delete_selected()?;

        println!("deleted {}", names.iter().join(", "));
        Ok(())
    }
}

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Show {
    #[structopt(flatten)]
    common: Common,
}

impl Show {
    pub fn exec(self) -> Result<(), Error> {
        let session = self.common.open_session()?;
        for (name, weight) in session.state() {
            println!("{:>6}  {}", weight, name);
        }
        Ok(())
    }
}

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Rollback {
    #[structopt(flatten)]
    common: Common,
}

impl Rollback {
    pub fn exec(self) -> Result<(), Error> {
        self.common.restore_backup()?;
        tracing::info!("state restored from backup");
        Ok(())
    }
}
