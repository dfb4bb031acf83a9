/// Monotonic ID generator shared by characters, dynasties, polities and regions.
/// No two entities of any type share an ID, so a bare `u64` is unambiguous
/// in the chronicle and in save files.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn starting_from(start: u64) -> Self {
        Self { next: start.max(1) }
    }

    /// A generator that will never hand out `highest` or anything below it.
    /// Used when resuming a loaded world.
    pub fn resume_after(highest: u64) -> Self {
        Self::starting_from(highest.saturating_add(1))
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_never_repeat() {
        let mut id_gen = IdGenerator::default();
        let ids: Vec<u64> = (0..4).map(|_| id_gen.next_id()).collect();
        assert_eq!(ids, [1, 2, 3, 4]);
    }

    #[test]
    fn zero_is_never_issued() {
        let mut id_gen = IdGenerator::starting_from(0);
        assert_eq!(id_gen.next_id(), 1);
    }

    #[test]
    fn resume_after_skips_loaded_ids() {
        let mut id_gen = IdGenerator::resume_after(41);
        assert_eq!(id_gen.next_id(), 42);
        let mut empty = IdGenerator::resume_after(0);
        assert_eq!(empty.next_id(), 1);
    }
}
