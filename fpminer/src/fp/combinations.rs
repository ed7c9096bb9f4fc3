use super::transaction::Item;
use super::utils::FrequentItemsets;

/// Calls `callback` with every `k`-element index combination of `0..n`, in
/// lexicographic order.
pub fn for_each_combination<F>(n: usize, k: usize, callback: &mut F)
where
    F: FnMut(&[usize]),
{
    if k == 0 || k > n {
        return;
    }
    let mut current = Vec::with_capacity(k);
    generate_combinations_recursive(n, k, 0, &mut current, callback);
}

fn generate_combinations_recursive<F>(
    n: usize,
    k: usize,
    start: usize,
    current: &mut Vec<usize>,
    callback: &mut F,
) where
    F: FnMut(&[usize]),
{
    if current.len() == k {
        callback(current);
        return;
    }

    for i in start..n {
        current.push(i);
        generate_combinations_recursive(n, k, i + 1, current, callback);
        current.pop();
    }
}

/// Records every non-empty subset of a single-path tree, extended by
/// `suffix`. The support of a subset is the smallest count among its nodes.
pub fn record_path_subsets<T: Item>(
    path: &[(T, usize)],
    suffix: &[T],
    result: &mut FrequentItemsets<T>,
) {
    for k in 1..=path.len() {
        for_each_combination(path.len(), k, &mut |combination: &[usize]| {
            let mut pattern = suffix.to_vec();
            let mut support = usize::MAX;
            for &idx in combination {
                pattern.push(path[idx].0.clone());
                support = support.min(path[idx].1);
            }
            result.insert(&pattern, support);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerates_combinations_in_order() {
        let mut seen = Vec::new();
        for_each_combination(4, 2, &mut |c: &[usize]| seen.push(c.to_vec()));
        assert_eq!(
            seen,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }

    #[test]
    fn out_of_range_k_yields_nothing() {
        let mut calls = 0;
        for_each_combination(3, 0, &mut |_: &[usize]| calls += 1);
        for_each_combination(3, 4, &mut |_: &[usize]| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn path_subsets_take_minimum_count() {
        let path = vec![(5, 10), (7, 8), (9, 5)];
        let mut result = FrequentItemsets::new();
        record_path_subsets(&path, &[1], &mut result);

        assert_eq!(result.len(), 7);
        assert_eq!(result.get(&[1, 5]), Some(10));
        assert_eq!(result.get(&[1, 5, 7]), Some(8));
        assert_eq!(result.get(&[1, 7, 9]), Some(5));
        assert_eq!(result.get(&[1, 5, 7, 9]), Some(5));
        assert_eq!(result.collisions(), 0);
    }
}
