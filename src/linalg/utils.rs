use ndarray::{ArrayBase, Data, Ix1, Ix2};

/// Compensated summation; keeps residual sums stable when many terms cancel.
#[derive(Default, Clone, Copy)]
pub(crate) struct KahanSum {
    sum: f64,
    c: f64,
}

impl KahanSum {
    pub(crate) fn add(&mut self, value: f64) {
        let y = value - self.c;
        let t = self.sum + y;
        self.c = (t - self.sum) - y;
        self.sum = t;
    }

    pub(crate) fn sum(self) -> f64 {
        self.sum
    }
}

/// Euclidean norm of every column.
pub(crate) fn column_norms<S: Data<Elem = f64>>(x: &ArrayBase<S, Ix2>) -> Vec<f64> {
    x.columns()
        .into_iter()
        .map(|col| {
            let mut acc = KahanSum::default();
            for &v in col.iter() {
                acc.add(v * v);
            }
            acc.sum().sqrt()
        })
        .collect()
}

/// Euclidean distance between two iterates of equal length.
pub(crate) fn euclidean_distance<S1, S2>(a: &ArrayBase<S1, Ix1>, b: &ArrayBase<S2, Ix1>) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
