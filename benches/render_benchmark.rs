use bubble_chat::{
    BubbleChat, ContentRenderer, PostStatus, RecordStore, Settings, Shortcodes,
};
use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion,
};

const BUBBLES: [usize; 3] = [1, 10, 100];

fn page(bubbles: usize) -> String {
    (0..bubbles)
        .map(|i| {
            format!(
                "<p>Paragraph {}</p>\n[chat icon=\"1\" name=\"Bot\" pos=\"{}\"]Line {}[/chat]\n",
                i,
                if i % 2 == 0 { "l" } else { "r" },
                i
            )
        })
        .collect()
}

fn render_benchmark(c: &mut Criterion) {
    let mut chat = BubbleChat::in_memory(Settings::default());
    chat.store_mut()
        .create("Bot", PostStatus::Publish)
        .expect("Failed to create avatar");

    let mut shortcodes = Shortcodes::new();
    chat.register_shortcode(&mut shortcodes);

    let mut group = c.benchmark_group("content_pass");
    for bubbles in BUBBLES {
        let text = page(bubbles);
        group.bench_with_input(
            BenchmarkId::new("render_content", bubbles),
            &text,
            |b, text| {
                b.iter(|| shortcodes.render_content(black_box(text)));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, render_benchmark);
criterion_main!(benches);
