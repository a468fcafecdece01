// Unilog - cli/progress.rs
//
// Cosmetic CLI progress rendering. The wrapper yields the input sequence
// unchanged; the bar on stderr is the only side effect.

use indicatif::{ProgressBar, ProgressBarIter, ProgressStyle};

/// Wrap an iterator in a labelled progress bar.
///
/// Value-preserving: every element passes through untouched and in order.
/// indicatif hides the bar when stderr is not a terminal, so wrapped
/// iterators are safe in pipelines and tests.
pub fn wrap<I>(iterable: I, label: &str) -> ProgressBarIter<I::IntoIter>
where
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator,
{
    let inner = iterable.into_iter();
    let bar = ProgressBar::new(inner.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message(label.to_string());
    bar.wrap_iter(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_iterator_is_value_preserving() {
        let items: Vec<i32> = wrap(0..5, "Processing").collect();
        assert_eq!(items, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn wrapped_iterator_preserves_empty_sequences() {
        let items: Vec<i32> = wrap(Vec::<i32>::new(), "Nothing").collect();
        assert!(items.is_empty());
    }
}
