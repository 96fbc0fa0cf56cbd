//! Value-grouped counts.

use alloc::vec::Vec;
use snapshot_core::Value;

/// The number of selected records sharing one dimension value.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupCount {
    pub key: Value,
    pub count: usize,
}

/// Collapses an ascending run of values into `{key, count}` pairs.
pub(crate) fn count_sorted<'a, I>(values: I) -> Vec<GroupCount>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut groups: Vec<GroupCount> = Vec::new();
    for value in values {
        match groups.last_mut() {
            Some(last) if last.key == *value => last.count += 1,
            _ => groups.push(GroupCount {
                key: value.clone(),
                count: 1,
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_count_sorted() {
        let values = vec![Value::from(1), Value::from(1), Value::from(2), Value::from(5)];
        let groups = count_sorted(&values);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0], GroupCount { key: Value::from(1), count: 2 });
        assert_eq!(groups[2], GroupCount { key: Value::from(5), count: 1 });
    }

    #[test]
    fn test_count_sorted_empty() {
        assert!(count_sorted(&[]).is_empty());
    }
}
