mod common;
mod draw;
mod names;

use structopt::StructOpt;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Session(#[from] rand_o_tron::session::Error),
}

/// Weighted random name picker where unlucky participants catch up
#[derive(StructOpt)]
#[structopt(name = "rand-o-tron", rename_all = "kebab-case")]
enum RandOTron {
    /// Draw a winner among the given names and update the counters
    Draw(draw::Draw),
    /// Register new names with the default counter
    Add(names::Add),
    /// Merge duplicate names into one, keeping the lowest counter
    Merge(names::Merge),
    /// Remove names from the state
    Delete(names::Delete),
    /// Print every registered name and its counter
    Show(names::Show),
    /// Restore the state as it was before the last changing command
    Rollback(names::Rollback),
}

impl RandOTron {
    fn exec(self) -> Result<(), Error> {
        match self {
            RandOTron::Draw(cmd) => cmd.exec(),
            RandOTron::Add(cmd) => cmd.exec(),
            RandOTron::Merge(cmd) => cmd.exec(),
            RandOTron::Delete(cmd) => cmd.exec(),
            RandOTron::Show(cmd) => cmd.exec(),
            RandOTron::Rollback(cmd) => cmd.exec(),
        }
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    RandOTron::from_args().exec()
}
