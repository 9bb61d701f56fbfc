//! Benchmarks for line parsing, classification and the full pipeline pass.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ircpipe::{classify, Capture, Message, Pipeline};

/// Simple PING message
const SIMPLE_MESSAGE: &str = "PING :irc.example.com";

/// Message with prefix
const PREFIX_MESSAGE: &str = ":nick!user@host PRIVMSG #channel :Hello, world!";

/// Message with IRCv3 tags
const TAGGED_MESSAGE: &str = "@time=2023-01-01T00:00:00.000Z;msgid=abc123;+example/tag=value :nick!user@host PRIVMSG #channel :Hello with tags!";

/// Welcome with a full user mask in the trailing text
const NUMERIC_RESPONSE: &str = ":irc.server.net 001 nickname :Welcome to the IRC Network nickname!user@host";

/// Numeric nobody classifies
const UNKNOWN_NUMERIC: &str = ":irc.server.net 433 * nickname :Nickname is already in use.";

const ALL: [(&str, &str); 5] = [
    ("simple", SIMPLE_MESSAGE),
    ("prefix", PREFIX_MESSAGE),
    ("tagged", TAGGED_MESSAGE),
    ("welcome", NUMERIC_RESPONSE),
    ("unknown", UNKNOWN_NUMERIC),
];

fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Message Parsing");

    for (name, line) in ALL {
        group.bench_with_input(BenchmarkId::new("parse", name), line, |b, s| {
            b.iter(|| {
                let msg = Message::parse(black_box(s)).unwrap();
                black_box(msg)
            })
        });
    }

    group.finish();
}

fn benchmark_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("Classification");

    for (name, line) in ALL {
        let parsed = Message::parse(line).unwrap();
        group.bench_with_input(BenchmarkId::new("classify", name), &parsed, |b, msg| {
            b.iter(|| {
                let event = classify(black_box(msg.clone()));
                black_box(event)
            })
        });
    }

    group.finish();
}

fn benchmark_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("Round Trip");

    for (name, line) in ALL {
        group.bench_with_input(BenchmarkId::new("parse_serialize", name), line, |b, s| {
            b.iter(|| {
                let msg = Message::parse(black_box(s)).unwrap();
                let serialized = msg.to_string();
                black_box(serialized)
            })
        });
    }

    group.finish();
}

fn benchmark_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Pipeline");

    group.bench_function("ingest_burst", |b| {
        b.iter(|| {
            let mut pipeline = Pipeline::standard();
            let mut out = Capture::new();
            for (_, line) in ALL {
                black_box(pipeline.ingest(black_box(line), &mut out));
            }
            black_box(out)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parsing,
    benchmark_classification,
    benchmark_round_trip,
    benchmark_pipeline,
);

criterion_main!(benches);
