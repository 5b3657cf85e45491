use criterion::{black_box, criterion_group, criterion_main, Criterion};
use makestyles_runtime::{
    Conditions, Document, Environment, MakeStyles, RendererRegistry, StyleDefinition,
    StyleDefinitionList, StyleOptions, StyleSource, StyleTree, Tokens,
};
use std::rc::Rc;

fn button_styles() -> StyleDefinitionList {
    vec![
        StyleDefinition::always(
            StyleTree::new()
                .set("display", "inline-flex")
                .set("padding", "4px 12px")
                .set("border", "1px solid transparent")
                .nested("&:hover", StyleTree::new().set("opacity", 0.9)),
        ),
        StyleDefinition::when(
            Conditions::new().with("appearance", "primary"),
            StyleSource::dynamic(|tokens| {
                StyleTree::new()
                    .set("background", tokens.token(&["brand", "bg"]))
                    .set("color", tokens.token(&["brand", "fg"]))
            }),
        ),
        StyleDefinition::when(
            Conditions::new().with("size", "large"),
            StyleTree::new().set("fontSize", 16).set("padding", "8px 20px"),
        ),
    ]
    .into_iter()
    .collect()
}

fn tokens() -> Rc<Tokens> {
    Rc::new(
        Tokens::new()
            .set(&["brand", "bg"], "#0078d4")
            .set(&["brand", "fg"], "#fff"),
    )
}

fn query_cached(c: &mut Criterion) {
    let document = Document::new();
    let options = StyleOptions::new(RendererRegistry::new().acquire(&document)).tokens(tokens());
    let styles = MakeStyles::with_environment(button_styles(), Environment::default()).unwrap();
    let selectors = Conditions::new().with("appearance", "primary").with("size", "large");

    c.bench_function("query_cached", |b| {
        b.iter(|| styles.query(black_box(&selectors), &options, &[]))
    });
}

fn query_with_overrides(c: &mut Criterion) {
    let document = Document::new();
    let options = StyleOptions::new(RendererRegistry::new().acquire(&document)).tokens(tokens());
    let styles = MakeStyles::with_environment(button_styles(), Environment::default()).unwrap();
    let override_class = styles.query(&Conditions::new().with("size", "large"), &options, &[]);
    let selectors = Conditions::new().with("appearance", "primary");

    c.bench_function("query_with_overrides", |b| {
        b.iter(|| {
            styles.query(
                black_box(&selectors),
                &options,
                &["host-class", override_class.as_str()],
            )
        })
    });
}

fn query_fallback(c: &mut Criterion) {
    let document = Document::new();
    let options = StyleOptions::new(RendererRegistry::new().acquire(&document)).tokens(tokens());
    let styles = MakeStyles::with_environment(button_styles(), Environment::fallback()).unwrap();
    let selectors = Conditions::new().with("appearance", "primary");

    c.bench_function("query_fallback", |b| {
        b.iter(|| styles.query(black_box(&selectors), &options, &[]))
    });
}

fn compile_list(c: &mut Criterion) {
    let tokens = tokens();

    c.bench_function("compile_list", |b| {
        b.iter(|| {
            let styles =
                MakeStyles::with_environment(button_styles(), Environment::default()).unwrap();
            styles.resolve(black_box(&tokens))
        })
    });
}

criterion_group!(
    benches,
    query_cached,
    query_with_overrides,
    query_fallback,
    compile_list
);
criterion_main!(benches);
