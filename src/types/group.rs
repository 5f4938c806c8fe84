use std::fmt;

use rand::Rng;

use crate::eval::Eval;
use crate::types::error::EvalError;
use crate::types::filter::Filter;
use crate::types::subject::Subject;

/// A registered rule with its scheduling attributes.
pub struct FilterPack {
    filter: Filter,
    id: String,
    weight: u32,
    priority: i32,
}

impl FilterPack {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn weight(&self) -> u32 {
        self.weight
    }

    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }
}

/// A contiguous run of equal-priority packs: `start..end` into the sorted
/// pack list, with the band's summed weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Band {
    start: usize,
    end: usize,
    weight: u64,
}

/// What a group run observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupOutcome {
    /// How many filters fired.
    pub matched: usize,
    /// The id of the last filter that fired.
    pub last_id: Option<String>,
}

/// A prioritized, weight-shuffled collection of rules evaluated against one
/// subject.
///
/// Packs are kept sorted by descending priority, stable among equals as
/// inserted. [`run`](GroupFilter::run) never mutates the shared ordering:
/// it computes each call's evaluation order into a local copy, so one
/// instance behind `Arc` serves concurrent callers.
pub struct GroupFilter {
    packs: Vec<FilterPack>,
    bands: Vec<Band>,
    total_weight: u64,
    batch: bool,
}

impl fmt::Debug for GroupFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupFilter")
            .field("packs", &self.packs.len())
            .field("bands", &self.bands)
            .field("total_weight", &self.total_weight)
            .field("batch", &self.batch)
            .finish()
    }
}

impl GroupFilter {
    /// `batch` controls whether a run stops at the first match or evaluates
    /// every pack.
    #[must_use]
    pub fn new(batch: bool) -> Self {
        Self {
            packs: Vec::new(),
            bands: Vec::new(),
            total_weight: 0,
            batch,
        }
    }

    #[must_use]
    pub fn is_batch(&self) -> bool {
        self.batch
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }

    /// The registered packs in descending-priority order.
    #[must_use]
    pub fn packs(&self) -> &[FilterPack] {
        &self.packs
    }

    /// Register a rule. Re-sorts the pack list (stable, descending
    /// priority) and rebuilds the priority bands and total weight.
    pub fn add(&mut self, filter: Filter, id: impl Into<String>, priority: i32, weight: u32) {
        self.packs.push(FilterPack {
            filter,
            id: id.into(),
            weight,
            priority,
        });
        self.packs.sort_by_key(|p| std::cmp::Reverse(p.priority));
        self.rebuild_bands();
    }

    fn rebuild_bands(&mut self) {
        self.bands.clear();
        self.total_weight = 0;
        let mut start = 0;
        while start < self.packs.len() {
            let priority = self.packs[start].priority;
            let mut end = start + 1;
            while end < self.packs.len() && self.packs[end].priority == priority {
                end += 1;
            }
            let weight: u64 = self.packs[start..end]
                .iter()
                .map(|p| u64::from(p.weight))
                .sum();
            self.bands.push(Band { start, end, weight });
            self.total_weight += weight;
            start = end;
        }
    }

    /// Evaluate the group against one subject.
    ///
    /// When the group carries weight, each weighted band's order is drawn
    /// proportionally to its members' weights; priority order across bands
    /// always holds. Non-batch runs stop at the first match; batch runs
    /// evaluate everything and count the matches.
    ///
    /// # Errors
    ///
    /// The first filter error aborts the run and propagates, after being
    /// logged with the offending pack's id.
    pub fn run(
        &self,
        ev: &Eval<'_>,
        subject: &mut dyn Subject,
    ) -> Result<GroupOutcome, EvalError> {
        let order = self.evaluation_order();
        let mut outcome = GroupOutcome::default();
        for idx in order {
            let pack = &self.packs[idx];
            match pack.filter.run(ev, subject) {
                Ok(true) => {
                    tracing::debug!(id = %pack.id, "filter matched");
                    outcome.matched += 1;
                    outcome.last_id = Some(pack.id.clone());
                    if !self.batch {
                        break;
                    }
                }
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(id = %pack.id, error = %err, "filter run failed");
                    return Err(err);
                }
            }
        }
        Ok(outcome)
    }

    /// This call's evaluation order: pack indices, weight-shuffled within
    /// each weighted band. The shared pack list is left untouched.
    fn evaluation_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.packs.len()).collect();
        if self.total_weight == 0 {
            return order;
        }
        let mut rng = rand::rng();
        for band in &self.bands {
            if band.weight == 0 {
                continue;
            }
            self.weighted_shuffle(&mut order[band.start..band.end], &mut rng);
        }
        order
    }

    /// Draw each slot proportionally to the remaining members' weights.
    /// Zero-weight members keep their relative order at the band's tail.
    fn weighted_shuffle(&self, slots: &mut [usize], rng: &mut impl Rng) {
        let mut remaining: u64 = slots
            .iter()
            .map(|&i| u64::from(self.packs[i].weight))
            .sum();
        for pos in 0..slots.len() {
            if remaining == 0 {
                break;
            }
            let mut ticket = rng.random_range(0..remaining);
            let mut chosen = pos;
            for j in pos..slots.len() {
                let w = u64::from(self.packs[slots[j]].weight);
                if w == 0 {
                    continue;
                }
                if ticket < w {
                    chosen = j;
                    break;
                }
                ticket -= w;
            }
            remaining -= u64::from(self.packs[slots[chosen]].weight);
            slots[pos..=chosen].rotate_right(1);
        }
    }
}

impl fmt::Display for GroupFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GroupFilter({} filters, {} bands, total weight {})",
            self.packs.len(),
            self.bands.len(),
            self.total_weight,
        )
    }
}
