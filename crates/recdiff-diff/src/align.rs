//! Service list alignment.
//!
//! The sample's service list is reordered so each entry sits at the same
//! index as its equivalent test entry. Matching is greedy and single-pass:
//! each test entry takes the first unconsumed equivalent sample entry. This
//! is not an optimal bipartite matching, but it is deterministic, keeps the
//! relative order of the sample, and costs O(n·m). Designated-field
//! equivalence is expected to be near-unique, so greedy rarely differs from
//! an optimal assignment.
//!
//! Test entries with no match get an empty placeholder so later entries keep
//! their index; unmatched sample entries follow in stored order.

use tracing::debug;

use recdiff_types::NestedRecord;

use crate::config::DiffConfig;

/// Return a copy of `sample` whose service list follows the order of `test`'s.
///
/// Everything outside the service list is untouched. If the configured path
/// does not hold a list of branches in *both* records (absent, or a single
/// branch because there is only one service), the sample is returned as is.
pub fn align_services(test: &NestedRecord, sample: &NestedRecord, config: &DiffConfig) -> NestedRecord {
    if !config.align_services {
        return sample.clone();
    }
    let path = &config.service_list_path;
    let (Some(test_services), Some(sample_services)) =
        (service_list(test, path), service_list(sample, path))
    else {
        debug!(path = %path.join("/"), "service list not present in both records, skipping alignment");
        return sample.clone();
    };

    let aligned = order_services(test_services, sample_services, &config.service_fields);
    debug!(
        test = test_services.len(),
        sample = sample_services.len(),
        aligned = aligned.len(),
        "aligned service list"
    );

    let mut out = sample.clone();
    if let Some(slot) = out.get_path_mut(path) {
        *slot = NestedRecord::List(aligned);
    }
    out
}

/// Two service entries are equivalent when every designated field is present
/// in both and the values are equal. A `null` field counts as missing.
pub fn services_equivalent(a: &NestedRecord, b: &NestedRecord, fields: &[String]) -> bool {
    fields.iter().all(|field| {
        match (designated(a, field), designated(b, field)) {
            (Some(NestedRecord::Leaf(x)), Some(NestedRecord::Leaf(y))) => x.same_text(y),
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    })
}

fn designated<'a>(service: &'a NestedRecord, field: &str) -> Option<&'a NestedRecord> {
    if !service.is_branch() {
        return None;
    }
    service
        .get(field)
        .filter(|v| !matches!(v, NestedRecord::Leaf(s) if s.is_null()))
}

fn service_list<'a>(record: &'a NestedRecord, path: &[String]) -> Option<&'a [NestedRecord]> {
    record
        .get_path(path)
        .and_then(NestedRecord::as_list)
        .filter(|items| items.iter().all(NestedRecord::is_branch))
}

fn order_services(
    test: &[NestedRecord],
    sample: &[NestedRecord],
    fields: &[String],
) -> Vec<NestedRecord> {
    let mut consumed = vec![false; sample.len()];
    let mut out = Vec::with_capacity(test.len() + sample.len());

    for test_service in test {
        let matched = sample
            .iter()
            .enumerate()
            .find(|(i, s)| !consumed[*i] && services_equivalent(test_service, s, fields))
            .map(|(i, _)| i);
        match matched {
            Some(i) => {
                consumed[i] = true;
                out.push(sample[i].clone());
            }
            None => out.push(NestedRecord::empty()),
        }
    }

    out.extend(
        sample
            .iter()
            .zip(&consumed)
            .filter(|(_, used)| !**used)
            .map(|(s, _)| s.clone()),
    );
    out
}
