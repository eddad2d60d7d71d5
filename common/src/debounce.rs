use crate::types::RawState;

/// Confirms a raw state once it has been seen more than `confirmation_threshold`
/// times in a row. Keeps confirming on every further matching observation.
#[derive(Debug, Clone)]
pub struct DebounceEngine {
    confirmation_threshold: u32,
    last_raw: Option<RawState>,
    consecutive: u32,
}

impl DebounceEngine {
    pub fn new(confirmation_threshold: u32) -> Self {
        Self {
            confirmation_threshold,
            last_raw: None,
            consecutive: 0,
        }
    }

    pub fn last_raw(&self) -> Option<RawState> {
        self.last_raw
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn observe(&mut self, raw: RawState) -> Option<RawState> {
        if self.last_raw == Some(raw) {
            self.consecutive = self.consecutive.saturating_add(1);
        } else {
            self.last_raw = Some(raw);
            self.consecutive = 1;
        }

        (self.consecutive > self.confirmation_threshold).then_some(raw)
    }

    pub fn reset(&mut self) {
        self.last_raw = None;
        self.consecutive = 0;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use RawState::{Off, On, Unreachable};

    fn run(engine: &mut DebounceEngine, inputs: &[RawState]) -> Vec<Option<RawState>> {
        inputs.iter().map(|raw| engine.observe(*raw)).collect()
    }

    #[test]
    fn confirms_after_threshold_plus_one() {
        let mut engine = DebounceEngine::new(3);

        assert_eq!(
            run(&mut engine, &[On, On, On, On, On]),
            vec![None, None, None, Some(On), Some(On)]
        );
        assert_eq!(engine.consecutive(), 5);
    }

    #[test]
    fn change_resets_counter_to_one() {
        let mut engine = DebounceEngine::new(3);
        run(&mut engine, &[On, On, On, On]);

        assert_eq!(engine.observe(Off), None);
        assert_eq!(engine.last_raw(), Some(Off));
        assert_eq!(engine.consecutive(), 1);

        assert_eq!(
            run(&mut engine, &[Off, Off, Off]),
            vec![None, None, Some(Off)]
        );
    }

    #[test]
    fn alternating_states_never_confirm() {
        let mut engine = DebounceEngine::new(3);
        let inputs: Vec<RawState> = (0..20).map(|i| if i % 2 == 0 { On } else { Off }).collect();

        assert!(run(&mut engine, &inputs).iter().all(Option::is_none));
        assert_eq!(engine.consecutive(), 1);
    }

    #[test]
    fn zero_threshold_confirms_immediately() {
        let mut engine = DebounceEngine::new(0);

        assert_eq!(engine.observe(Unreachable), Some(Unreachable));
        assert_eq!(engine.observe(On), Some(On));
    }

    #[test]
    fn emits_iff_trailing_window_is_uniform() {
        let threshold = 2;
        let inputs = [On, On, Off, Off, Off, Off, Unreachable, Off, Off, Off, On];
        let mut engine = DebounceEngine::new(threshold);

        for (i, raw) in inputs.iter().enumerate() {
            let window = threshold as usize + 1;
            let uniform = i + 1 >= window && inputs[i + 1 - window..=i].iter().all(|s| s == raw);
            let expected = uniform.then_some(*raw);
            assert_eq!(engine.observe(*raw), expected, "cycle {i}");
        }
    }

    #[test]
    fn reset_rearms_from_empty() {
        let mut engine = DebounceEngine::new(1);
        run(&mut engine, &[Off, Off, Off]);

        engine.reset();

        assert_eq!(engine.last_raw(), None);
        assert_eq!(engine.consecutive(), 0);
        assert_eq!(engine.observe(Off), None);
        assert_eq!(engine.observe(Off), Some(Off));
    }
}
