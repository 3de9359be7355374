use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use impulse_kernel::security::PermissionSet;
use impulse_layout::domain::layout::{Layout, LayoutBody, LayoutNode, LayoutScope};
use impulse_layout::{ComponentRegistry, LayoutResolver, components, core_layouts};
use std::hint::black_box;

// ============================================================================
// Benchmark: Core layouts
// ============================================================================

fn bench_core_layouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("core_layouts");

    let registry = ComponentRegistry::new();
    components::bootstrap(&registry, LayoutScope::Site);
    let resolver = LayoutResolver::new(registry);
    let viewer = PermissionSet::new();

    for layout in core_layouts() {
        group.bench_with_input(BenchmarkId::new("resolve", &layout.layout_type), &layout, |b, layout| {
            b.iter(|| black_box(resolver.resolve(layout, &viewer)));
        });
        let tree = resolver.resolve(&layout, &viewer);
        group.bench_with_input(BenchmarkId::new("to_html", &layout.layout_type), &tree, |b, tree| {
            b.iter(|| black_box(tree.to_html()));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Wide dashboards with permission filtering
// ============================================================================

fn dashboard(cards: usize) -> Layout {
    let grid = LayoutNode::new("grid", "AdminGrid").with_children((0..cards).map(|i| {
        let kind = ["StatsCards", "Card", "ActiveUsersList", "Badge"][i % 4];
        LayoutNode::new(format!("card-{i}"), kind).with_prop("text", "42")
    }));
    Layout {
        id: "dashboard".to_owned(),
        body: LayoutBody { components: vec![grid], version: 1 },
        ..Layout::default()
    }
}

fn bench_dashboard(c: &mut Criterion) {
    let mut group = c.benchmark_group("dashboard");

    let registry = ComponentRegistry::new();
    components::bootstrap(&registry, LayoutScope::Admin);
    let resolver = LayoutResolver::new(registry);
    let viewers = [("viewer", PermissionSet::from_iter(["admin:view"])), ("admin", PermissionSet::all())];

    for cards in [16, 256] {
        let layout = dashboard(cards);
        group.throughput(Throughput::Elements(u64::try_from(cards).unwrap_or(u64::MAX)));
        for (name, viewer) in &viewers {
            group.bench_with_input(BenchmarkId::new(*name, cards), &layout, |b, layout| {
                b.iter(|| black_box(resolver.resolve(layout, viewer)));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_core_layouts, bench_dashboard);
criterion_main!(benches);
