//! Converter graph and path search.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use skript_foundation::{TypeId, Value};

/// Default bound on the number of converter steps in one conversion.
pub const MAX_CONVERSION_DEPTH: usize = 4;

/// Converts a value of one type into another, or `None` when this particular
/// value has no counterpart in the target type.
pub type ConverterFn = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// A registered `from -> to` converter.
#[derive(Clone)]
pub(crate) struct Converter {
    pub from: TypeId,
    pub to: TypeId,
    pub func: ConverterFn,
}

/// The resolved chain of converters between two types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionPath {
    /// Type the conversion starts from.
    pub from: TypeId,
    /// Types produced by each step, in order. The last one is assignable to
    /// the requested target.
    pub steps: Vec<TypeId>,
    converters: Vec<usize>,
}

impl ConversionPath {
    /// Number of converter applications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Returns true for the empty path (plain assignment).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    pub(crate) fn converters(&self) -> &[usize] {
        &self.converters
    }
}

/// Computes the shortest conversion path for every ordered pair of types
/// that is not already related by assignment.
///
/// `assignable(a, b)` answers whether `a` may be used where `b` is expected.
/// A converter registered for `s` applies to every type assignable to `s`.
/// Neighbours are explored in converter registration order, so the result is
/// deterministic.
pub(crate) fn all_paths(
    type_count: usize,
    converters: &[Converter],
    max_depth: usize,
    assignable: impl Fn(TypeId, TypeId) -> bool,
) -> HashMap<(TypeId, TypeId), ConversionPath> {
    let ids: Vec<TypeId> = (0..type_count)
        .filter_map(|i| u32::try_from(i).ok())
        .map(TypeId::from_index)
        .collect();
    let mut paths = HashMap::new();

    for &source in &ids {
        // (reached type, converter chain), in breadth-first order
        let mut reached: Vec<(TypeId, Vec<usize>)> = Vec::new();
        let mut seen = vec![false; type_count];
        seen[source.index() as usize] = true;
        let mut queue = VecDeque::from([(source, Vec::<usize>::new())]);

        while let Some((current, chain)) = queue.pop_front() {
            if chain.len() >= max_depth {
                continue;
            }
            for (idx, conv) in converters.iter().enumerate() {
                if !assignable(current, conv.from) {
                    continue;
                }
                let slot = conv.to.index() as usize;
                if seen[slot] {
                    continue;
                }
                seen[slot] = true;
                let mut next = chain.clone();
                next.push(idx);
                reached.push((conv.to, next.clone()));
                queue.push_back((conv.to, next));
            }
        }

        for &target in &ids {
            if assignable(source, target) {
                continue;
            }
            let hit = reached.iter().find(|(ty, _)| assignable(*ty, target));
            if let Some((_, chain)) = hit {
                paths.insert(
                    (source, target),
                    ConversionPath {
                        from: source,
                        steps: chain.iter().map(|&c| converters[c].to).collect(),
                        converters: chain.clone(),
                    },
                );
            }
        }
    }

    paths
}
