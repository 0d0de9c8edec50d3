use crate::draw;
use crate::state::{self, Participant, Selection, State};
use crate::store::Store;
use rand::Rng;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Draw(#[from] draw::Error),

    #[error(transparent)]
    Wire(#[from] state::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One user session over a stored state.
///
/// Owns the state and the current selection, writes the state back through
/// the store after every mutation, and keeps a snapshot of the state it was
/// opened with so a session can be rolled back.
pub struct Session<S: Store> {
    store: S,
    state: State,
    initial_state: State,
    selection: Selection,
}

impl<S: Store> Session<S> {
    pub fn open(store: S) -> Result<Self, Error> {
        let state = state::deserialize(&store.read()?)?;
        tracing::debug!("loaded state with {} names", state.len());
        Ok(Self {
            initial_state: state.clone(),
            state,
            selection: Selection::new(),
            store,
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn toggle_selected(&mut self, name: &str, selected: bool) {
        if selected {
            self.selection.insert(name.to_string());
        } else {
            self.selection.remove(name);
        }
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Register a name typed in by the user, leaving everyone else's
    /// counters alone.
    pub fn register_new_name(&mut self, name: &str) -> Result<(), Error> {
        draw::register_new_names(&mut self.state, &Selection::from([name.to_string()]));
        self.save()
    }

    /// Run one full round against the current selection: draw a winner,
    /// apply the counter updates and persist.
    pub fn execute<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Participant, Error> {
        let winner = draw::draw(rng, &self.state, &self.selection)?;
        draw::update_state_post_draw(rng, &mut self.state, &self.selection, &winner)?;
        self.save()?;
        Ok(winner)
    }

    pub fn merge(&mut self, names: &Selection, new_name: &str) -> Result<(), Error> {
        draw::merge_names(&mut self.state, names, new_name)?;
        self.reset()
    }

    pub fn delete_selected(&mut self) -> Result<(), Error> {
        draw::delete_names(&mut self.state, &self.selection);
        self.reset()
    }

    /// Throw away everything this session did and persist the state it was
    /// opened with.
    pub fn rollback(&mut self) -> Result<(), Error> {
        tracing::debug!("rolling back to the state loaded at open");
        self.state = self.initial_state.clone();
        self.save()
    }

    fn reset(&mut self) -> Result<(), Error> {
        self.selection.clear();
        self.save()
    }

    fn save(&mut self) -> Result<(), Error> {
        let blob = state::serialize(&self.state)?;
        self.store.write(&blob)?;
        tracing::debug!("saved state with {} names", self.state.len());
        Ok(())
    }
}
