//! Proportional retreat of surviving attackers.
//!
//! When an attack fails to take its target, the surviving attackers go back
//! to the territories they came from, each source receiving a share
//! proportional to what it sent. Shares are floored; the last source takes
//! whatever rounding left over, so the total always equals the survivor
//! count.

use crate::board::Position;

/// Splits `survivors` across `contributions` in proportion to each source's
/// stone count.
///
/// `contributions` keeps its order; the last entry absorbs the remainder.
/// Returns an empty vec when there is nothing to split or nowhere to send it.
pub fn distribute_retreat(contributions: &[(Position, u32)], survivors: u32) -> Vec<(Position, u32)> {
    let total: u64 = contributions.iter().map(|&(_, c)| c as u64).sum();
    if contributions.is_empty() || total == 0 {
        return Vec::new();
    }

    let mut shares = Vec::with_capacity(contributions.len());
    let mut assigned = 0u32;
    let last = contributions.len() - 1;

    for (i, &(source, sent)) in contributions.iter().enumerate() {
        let share = if i == last {
            survivors - assigned
        } else {
            (survivors as u64 * sent as u64 / total) as u32
        };
        assigned += share;
        shares.push((source, share));
    }

    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(r: u16, c: u16) -> Position {
        Position::new(r, c)
    }

    #[test]
    fn single_source_gets_everything() {
        assert_eq!(distribute_retreat(&[(p(0, 0), 5)], 3), vec![(p(0, 0), 3)]);
    }

    #[test]
    fn even_split() {
        let out = distribute_retreat(&[(p(0, 0), 2), (p(0, 2), 2)], 4);
        assert_eq!(out, vec![(p(0, 0), 2), (p(0, 2), 2)]);
    }

    #[test]
    fn last_source_absorbs_remainder() {
        // 5 survivors over 1:1:1 -> floor(5/3) = 1, 1, then 3.
        let out = distribute_retreat(&[(p(0, 0), 3), (p(0, 2), 3), (p(1, 1), 3)], 5);
        assert_eq!(out, vec![(p(0, 0), 1), (p(0, 2), 1), (p(1, 1), 3)]);
    }

    #[test]
    fn proportional_to_contribution() {
        // 6 survivors, sources sent 6 and 3 -> 4 and 2.
        let out = distribute_retreat(&[(p(0, 0), 6), (p(0, 2), 3)], 6);
        assert_eq!(out, vec![(p(0, 0), 4), (p(0, 2), 2)]);
    }

    #[test]
    fn zero_survivors_returns_zero_shares() {
        let out = distribute_retreat(&[(p(0, 0), 2), (p(0, 2), 1)], 0);
        assert!(out.iter().all(|&(_, s)| s == 0));
    }

    #[test]
    fn nothing_to_split() {
        assert!(distribute_retreat(&[], 4).is_empty());
    }

    #[test]
    fn total_is_conserved() {
        let contributions = [(p(0, 0), 7), (p(0, 2), 1), (p(1, 1), 4), (p(2, 1), 9)];
        for survivors in 0..=21 {
            let out = distribute_retreat(&contributions, survivors);
            assert_eq!(out.iter().map(|&(_, s)| s).sum::<u32>(), survivors);
        }
    }
}
