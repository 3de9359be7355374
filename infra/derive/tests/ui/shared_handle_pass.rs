use impulse_derive::shared_handle;

#[shared_handle]
pub struct Counter {
    pub hits: std::sync::atomic::AtomicU64,
}

fn main() {
    let counter = Counter::from_state(CounterState { hits: std::sync::atomic::AtomicU64::new(0) });
    let alias = counter.clone();
    alias.hits.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    assert!(counter.same_as(&alias));
}
