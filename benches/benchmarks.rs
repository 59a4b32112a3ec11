criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        evaluating_river_bitwise,
        evaluating_river_exhaustive,
        dealing_and_listing_legal_actions,
        building_preflop_observation,
        suggesting_preflop_open,
        suggesting_flop_line,
}

fn river() -> (Vec<Card>, Vec<Card>) {
    (
        Card::parse("AsKs").expect("hole"),
        Card::parse("Qs Js 2d 7c 9h").expect("board"),
    )
}

fn flop() -> HandState {
    HandState::start(&SessionConfig::default(), "bench", "bench-flop", 0, Some(11))
        .and_then(|s| s.try_apply(Action::Call, None))
        .and_then(|s| s.try_apply(Action::Check, None))
        .expect("limped flop")
}

fn evaluating_river_bitwise(c: &mut criterion::Criterion) {
    let (ref hole, ref board) = river();
    c.bench_function("evaluate a river with the Bitwise evaluator", |b| {
        b.iter(|| Bitwise.evaluate(hole, board))
    });
}

fn evaluating_river_exhaustive(c: &mut criterion::Criterion) {
    let (ref hole, ref board) = river();
    c.bench_function("evaluate a river with the Exhaustive evaluator", |b| {
        b.iter(|| Exhaustive.evaluate(hole, board))
    });
}

fn dealing_and_listing_legal_actions(c: &mut criterion::Criterion) {
    let ref cfg = SessionConfig::default();
    c.bench_function("deal a seeded hand and list legal actions", |b| {
        b.iter(|| HandState::start(cfg, "bench", "bench-deal", 0, Some(7)).map(|s| s.legal()))
    });
}

fn building_preflop_observation(c: &mut criterion::Criterion) {
    let state = HandState::start(&SessionConfig::default(), "bench", "bench-obs", 0, Some(3)).expect("deal");
    let ref acts = state.legal();
    let bundle = std::sync::Arc::new(Bundle::builtin(Strategy::Medium));
    c.bench_function("build a preflop Observation", |b| {
        b.iter(|| Observation::build(&state, 0, acts, bundle.clone(), &Bitwise))
    });
}

fn suggesting_preflop_open(c: &mut criterion::Criterion) {
    let ref ctx = AdvisorContext::default();
    let state = HandState::start(&SessionConfig::default(), "bench", "bench-open", 0, Some(5)).expect("deal");
    c.bench_function("suggest a preflop action", |b| {
        b.iter(|| build_suggestion(&state, 0, ctx))
    });
}

fn suggesting_flop_line(c: &mut criterion::Criterion) {
    let ref ctx = AdvisorContext::default();
    let ref state = flop();
    c.bench_function("suggest a flop action", |b| {
        b.iter(|| build_suggestion(state, state.to_act(), ctx))
    });
}

use headsup::advisor::AdvisorContext;
use headsup::advisor::Bundle;
use headsup::advisor::Observation;
use headsup::advisor::Strategy;
use headsup::advisor::build_suggestion;
use headsup::cards::Bitwise;
use headsup::cards::Card;
use headsup::cards::Evaluate;
use headsup::cards::Exhaustive;
use headsup::gameplay::Action;
use headsup::gameplay::HandState;
use headsup::gameplay::SessionConfig;
