use super::common::Common;
use super::Error;
use rand::{thread_rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_o_tron::state::Selection;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Draw {
    #[structopt(flatten)]
    common: Common,

    /// Seed the draw for reproducible results
    #[structopt(long)]
    seed: Option<u64>,

    /// Names taking part in this round
    #[structopt(required = true)]
    names: Vec<String>,
}

impl Draw {
    pub fn exec(self) -> Result<(), Error> {
        let Draw {
            common,
            seed,
            names,
        } = self;
        common.backup()?;

        let mut session = common.open_session()?;
        session.set_selection(names.into_iter().collect::<Selection>());
        let winner = match seed {
            Some(seed) => session.execute(&mut ChaCha8Rng::seed_from_u64(seed))?,
            None => session.execute(&mut thread_rng())?,
        };

        println!("{}", winner);
        Ok(())
    }
}
