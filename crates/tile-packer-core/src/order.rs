use std::cmp::Ordering;

use crate::model::SourceImage;

/// `max(w,h) / min(w,h) * area`: large and elongated images score highest.
pub fn squareness(w: u32, h: u32) -> f64 {
    let (w, h) = (w as f64, h as f64);
    let min = w.min(h);
    if min == 0.0 {
        return 0.0;
    }
    w.max(h) / min * (w * h)
}

/// Returns input indices in packing order: squareness descending, then path ascending (images
/// without a path last), then input index.
pub fn packing_order(images: &[SourceImage<'_>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..images.len()).collect();
    order.sort_by(|&a, &b| compare(&images[a], a, &images[b], b));
    order
}

fn compare(a: &SourceImage<'_>, ai: usize, b: &SourceImage<'_>, bi: usize) -> Ordering {
    squareness(b.width, b.height)
        .total_cmp(&squareness(a.width, a.height))
        .then_with(|| match (&a.path, &b.path) {
            (Some(pa), Some(pb)) => pa.cmp(pb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| ai.cmp(&bi))
}
