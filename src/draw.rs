//! Weighted draw over a state of name -> counter, and the counter updates
//! applied after each round.

use crate::state::{Participant, Selection, State, Weight};
use rand::seq::SliceRandom;
use rand::Rng;

/// Weight assumed for names that have not been registered yet.
const DEFAULT_WEIGHT: Weight = 1;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no names selected")]
    InvalidSelection,

    #[error("could not draw from an empty entry list")]
    EmptyEntries,

    #[error("winner {0} was not among the selected names")]
    UnknownWinner(Participant),

    #[error("name {0} is not part of the state")]
    UnknownName(Participant),
}

/// Flatten the selection into draw entries: a name with counter `k`
/// occupies `k` slots, giving it a `k / total` chance of being drawn.
/// Names missing from the state count as [`DEFAULT_WEIGHT`].
///
/// Callers must not rely on the order of the returned entries.
pub fn setup_draw_entries(state: &State, selected: &Selection) -> Result<Vec<Participant>, Error> {
    if selected.is_empty() {
        return Err(Error::InvalidSelection);
    }
    let mut entries = Vec::new();
    for name in selected {
        let count = state.get(name).copied().unwrap_or(DEFAULT_WEIGHT);
        entries.extend(std::iter::repeat(name.clone()).take(count as usize));
    }
    Ok(entries)
}

/// Pick one entry uniformly at random.
pub fn draw_winner<R: Rng + ?Sized>(
    rng: &mut R,
    entries: &[Participant],
) -> Result<Participant, Error> {
    entries.choose(rng).cloned().ok_or(Error::EmptyEntries)
}

/// Pick the participant whose counter gets the consolation increment.
///
/// Unlike the winner, the loser is chosen uniformly among the remaining
/// selected names, regardless of their counters. Returns `None` when the
/// winner was the only selected name.
pub fn select_loser<R: Rng + ?Sized>(
    rng: &mut R,
    selected: &Selection,
    winner: &str,
) -> Result<Option<Participant>, Error> {
    if !selected.contains(winner) {
        return Err(Error::UnknownWinner(winner.to_string()));
    }
    let remaining: Vec<&Participant> = selected
        .iter()
        .filter(|name| name.as_str() != winner)
        .collect();
    Ok(remaining.choose(rng).map(|name| (*name).clone()))
}

/// Insert every selected name that is not yet registered with the default
/// weight. Existing counters and unselected names are left untouched.
pub fn register_selected(state: &mut State, selected: &Selection) {
    for name in selected {
        state.entry(name.clone()).or_insert(DEFAULT_WEIGHT);
    }
}

/// Same as [`register_selected`], for names added outside of a draw.
pub fn register_new_names(state: &mut State, names: &Selection) {
    register_selected(state, names);
}

/// Apply the post-draw counter updates: the loser (if any) is incremented,
/// the winner's counter is fully reset to the default.
///
/// Both names are validated before the state is touched, so a failed call
/// leaves the state exactly as it was.
pub fn update_state(state: &mut State, winner: &str, loser: Option<&str>) -> Result<(), Error> {
    if !state.contains_key(winner) {
        return Err(Error::UnknownName(winner.to_string()));
    }
    if let Some(loser) = loser {
        let weight = state
            .get_mut(loser)
            .ok_or_else(|| Error::UnknownName(loser.to_string()))?;
        *weight += 1;
    }
    state.insert(winner.to_string(), DEFAULT_WEIGHT);
    Ok(())
}

/// Run one draw without mutating the state; counter updates are a separate
/// explicit step ([`update_state_post_draw`]).
pub fn draw<R: Rng + ?Sized>(
    rng: &mut R,
    state: &State,
    selected: &Selection,
) -> Result<Participant, Error> {
    let entries = setup_draw_entries(state, selected)?;
    draw_winner(rng, &entries)
}

/// Pick a loser and apply the counter updates for a finished draw.
///
/// Selected names that were never registered (added during the same turn)
/// get their default weight first, so the increment and reset always see
/// known names.
pub fn update_state_post_draw<R: Rng + ?Sized>(
    rng: &mut R,
    state: &mut State,
    selected: &Selection,
    winner: &str,
) -> Result<(), Error> {
    let loser = select_loser(rng, selected, winner)?;
    register_selected(state, selected);
    update_state(state, winner, loser.as_deref())
}

/// Merge duplicate or renamed participants into `new_name`.
///
/// The surviving name inherits the minimum counter among the merged ones,
/// so merging can never inflate anyone's odds. Fails with
/// [`Error::InvalidSelection`] when none of the names are registered.
pub fn merge_names(state: &mut State, names: &Selection, new_name: &str) -> Result<(), Error> {
    let min_weight = names
        .iter()
        .filter_map(|name| state.get(name))
        .copied()
        .min()
        .ok_or(Error::InvalidSelection)?;
    for name in names {
        state.remove(name);
    }
    state.insert(new_name.to_string(), min_weight);
    Ok(())
}

/// Remove every given name from the state. Unregistered names are ignored.
pub fn delete_names(state: &mut State, names: &Selection) {
    for name in names {
        state.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const ME: &str = "me";
    const YOU: &str = "you";
    const HIM: &str = "him";
    const HER: &str = "her";
    const THEM: &str = "them";

    const DRAWS: usize = 10_000;

    fn weights(entries: &[(&str, Weight)]) -> State {
        entries
            .iter()
            .map(|(name, weight)| (name.to_string(), *weight))
            .collect()
    }

    fn names(selected: &[&str]) -> Selection {
        selected.iter().map(|name| name.to_string()).collect()
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::from_seed([7; 32])
    }

    #[test]
    fn entries_repeat_each_name_according_to_its_counter() {
        let state = weights(&[(ME, 1), (YOU, 3), (HIM, 2), (HER, 1)]);

        let entries = setup_draw_entries(&state, &names(&[ME, YOU, HIM, HER])).unwrap();
        assert_eq!(
            entries.iter().sorted().collect_vec(),
            [HER, HIM, HIM, ME, YOU, YOU, YOU]
        );

        let entries = setup_draw_entries(&state, &names(&[HIM, HER])).unwrap();
        assert_eq!(entries.iter().sorted().collect_vec(), [HER, HIM, HIM]);
    }

    #[test]
    fn entries_count_unknown_names_once() {
        let state = weights(&[(ME, 1), (YOU, 3)]);
        let entries = setup_draw_entries(&state, &names(&[YOU, "someone"])).unwrap();
        assert_eq!(
            entries.iter().sorted().collect_vec(),
            ["someone", YOU, YOU, YOU]
        );
    }

    #[test]
    fn entries_length_matches_the_summed_counters() {
        let state = weights(&[(ME, 4), (YOU, 2), (THEM, 9)]);
        for selected in [
            names(&[ME]),
            names(&[ME, YOU]),
            names(&[ME, YOU, THEM, "someone"]),
        ] {
            let expected: Weight = selected
                .iter()
                .map(|name| state.get(name).copied().unwrap_or(1))
                .sum();
            let entries = setup_draw_entries(&state, &selected).unwrap();
            assert_eq!(entries.len() as Weight, expected);
        }
    }

    #[test]
    fn empty_selection_is_rejected() {
        let state = weights(&[(ME, 1)]);
        assert!(matches!(
            setup_draw_entries(&state, &Selection::new()),
            Err(Error::InvalidSelection)
        ));
    }

    #[test]
    fn cannot_draw_from_empty_entries() {
        assert!(matches!(
            draw_winner(&mut rng(), &[]),
            Err(Error::EmptyEntries)
        ));
    }

    #[test]
    fn winner_odds_follow_the_counters() {
        let entries = vec![ME.to_string(), ME.to_string(), YOU.to_string()];
        let mut rng = rng();
        let counts = (0..DRAWS)
            .map(|_| draw_winner(&mut rng, &entries).unwrap())
            .counts();

        assert_eq!(
            counts.keys().map(|name| name.as_str()).sorted().collect_vec(),
            [ME, YOU]
        );
        let ratio = counts[ME] as f64 / counts[YOU] as f64;
        assert!((1.5..=2.5).contains(&ratio), "ratio was {}", ratio);
    }

    #[test]
    fn loser_requires_the_winner_to_be_selected() {
        assert!(matches!(
            select_loser(&mut rng(), &names(&[ME, YOU]), THEM),
            Err(Error::UnknownWinner(name)) if name == THEM
        ));
    }

    #[test]
    fn no_loser_when_the_winner_stands_alone() {
        let loser = select_loser(&mut rng(), &names(&[ME]), ME).unwrap();
        assert_eq!(loser, None);
    }

    #[test]
    fn loser_is_drawn_uniformly_among_the_rest() {
        let selected = names(&[ME, YOU, THEM]);
        let mut rng = rng();
        let counts = (0..DRAWS)
            .map(|_| select_loser(&mut rng, &selected, THEM).unwrap().unwrap())
            .counts();

        assert_eq!(
            counts.keys().map(|name| name.as_str()).sorted().collect_vec(),
            [ME, YOU]
        );
        let ratio = counts[ME] as f64 / counts[YOU] as f64;
        assert!((0.75..=1.25).contains(&ratio), "ratio was {}", ratio);
    }

    #[test]
    fn registering_known_names_changes_nothing() {
        let mut state = weights(&[(ME, 3), (YOU, 1), (THEM, 1)]);
        let before = state.clone();
        register_selected(&mut state, &names(&[ME, YOU]));
        assert_eq!(state, before);
    }

    #[test]
    fn registering_new_names_adds_them_with_the_default_weight() {
        let mut state = weights(&[(ME, 3)]);
        register_selected(&mut state, &names(&[HIM, HER]));
        assert_eq!(state, weights(&[(ME, 3), (HIM, 1), (HER, 1)]));
    }

    #[test]
    fn update_increments_the_loser_and_resets_the_winner() {
        let mut state = weights(&[(ME, 3), (YOU, 1), (THEM, 1)]);
        update_state(&mut state, ME, Some(YOU)).unwrap();
        assert_eq!(state, weights(&[(ME, 1), (YOU, 2), (THEM, 1)]));
    }

    #[test]
    fn update_without_a_loser_only_resets_the_winner() {
        let mut state = weights(&[(ME, 3), (YOU, 1), (THEM, 1)]);
        update_state(&mut state, ME, None).unwrap();
        assert_eq!(state, weights(&[(ME, 1), (YOU, 1), (THEM, 1)]));
    }

    #[test]
    fn update_rejects_unknown_names_without_touching_the_state() {
        let mut state = weights(&[(ME, 3), (YOU, 1)]);
        let before = state.clone();

        assert!(matches!(
            update_state(&mut state, THEM, Some(YOU)),
            Err(Error::UnknownName(name)) if name == THEM
        ));
        assert_eq!(state, before);

        assert!(matches!(
            update_state(&mut state, ME, Some(THEM)),
            Err(Error::UnknownName(name)) if name == THEM
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn draw_returns_a_selected_name_and_leaves_the_state_alone() {
        let state = weights(&[(ME, 3), (YOU, 1)]);
        let before = state.clone();
        let selected = names(&[ME, YOU]);
        let mut rng = rng();
        for _ in 0..100 {
            let winner = draw(&mut rng, &state, &selected).unwrap();
            assert!(selected.contains(&winner));
        }
        assert_eq!(state, before);
    }

    #[test]
    fn post_draw_update_registers_fresh_names_first() {
        // "newbie" only exists in the selection; it must end up registered
        // and eligible for the consolation increment.
        let mut state = weights(&[(ME, 3)]);
        update_state_post_draw(&mut rng(), &mut state, &names(&[ME, "newbie"]), ME).unwrap();
        assert_eq!(state, weights(&[(ME, 1), ("newbie", 2)]));
    }

    #[test]
    fn post_draw_update_penalizes_exactly_one_other_name() {
        let mut state = weights(&[(ME, 3), (YOU, 2), (THEM, 5)]);
        update_state_post_draw(&mut rng(), &mut state, &names(&[ME, YOU, THEM]), THEM).unwrap();

        assert_eq!(state[THEM], 1);
        assert!(state[ME] == 3 || state[ME] == 4);
        assert!(state[YOU] == 2 || state[YOU] == 3);
        // one increment and one reset, nothing else
        assert_eq!(state.values().sum::<Weight>(), 3 + 2 + 1 + 1);
    }

    #[test]
    fn merging_keeps_the_minimum_counter() {
        let mut state = weights(&[(ME, 3), (YOU, 1)]);
        merge_names(&mut state, &names(&[ME, YOU]), "us").unwrap();
        assert_eq!(state, weights(&[("us", 1)]));
    }

    #[test]
    fn merging_ignores_names_that_were_never_registered() {
        let mut state = weights(&[(ME, 3), (YOU, 1)]);
        merge_names(&mut state, &names(&[ME, THEM]), "us").unwrap();
        assert_eq!(state, weights(&[("us", 3), (YOU, 1)]));
    }

    #[test]
    fn merging_nothing_is_rejected() {
        let mut state = weights(&[(ME, 3)]);
        let before = state.clone();

        assert!(matches!(
            merge_names(&mut state, &Selection::new(), "us"),
            Err(Error::InvalidSelection)
        ));
        assert!(matches!(
            merge_names(&mut state, &names(&[THEM]), "us"),
            Err(Error::InvalidSelection)
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn deleting_removes_present_names_and_ignores_the_rest() {
        let mut state = weights(&[(ME, 3), (YOU, 1), (THEM, 2)]);
        delete_names(&mut state, &names(&[YOU, "someone"]));
        assert_eq!(state, weights(&[(ME, 3), (THEM, 2)]));
    }
}
