// benches/bench_rewrite.rs
//
// time rewriting a small syslog-like document

#![allow(non_snake_case)]

use ::criterion::{black_box, criterion_group, criterion_main, Criterion};
use ::rand::SeedableRng;

use rewordlib::common::SessionRng;
use rewordlib::data::token::tokenize;
use rewordlib::rules::RuleSet;
use rewordlib::session::RewriteSession;

const LOG: &str = "\
Feb  7 12:57:36 host1 sshd[4242]: Accepted publickey for alice from 192.168.1.20 port 52114 ssh2\n\
Feb  7 12:57:37 host1 kernel: eth0: link up, mac 00:1A:2B:3C:4D:5E, inet6 fe80::1ff:fe23:4567:890a\n\
Feb  7 12:57:38 host1 nginx: GET https://www.example.com/index.html?user=alice 200 0.532s\n\
Feb  7 12:57:39 host1 cron[311]: (root) CMD (/usr/local/bin/backup.sh --id=0x1F3A)\n\
-rwxr-xr-x 1 root root 4096 2026-02-07 12:57:40 backup.sh\n";

const RULES: &str = "rewrite_datetime: yes, 1, 3\n";

#[inline(never)]
fn tokenize_lines() {
    for line in LOG.lines() {
        black_box(tokenize(black_box(line)));
    }
}

#[inline(never)]
fn rewrite_default(session: &mut RewriteSession) {
    black_box(session.generate(black_box(LOG)));
}

// criterion runners

fn criterion_benchmark(c: &mut Criterion) {
    let mut bg = c.benchmark_group("rewrite");
    bg.bench_function("tokenize_lines", |b| b.iter(tokenize_lines));

    let mut session = RewriteSession::with_rng(RuleSet::default(), SessionRng::seed_from_u64(0));
    bg.bench_function("generate_default_rules", |b| b.iter(|| rewrite_default(&mut session)));

    let rules = match RuleSet::from_yaml_str(RULES) {
        Ok(rules) => rules,
        Err(err) => panic!("bad rules {:?}: {}", RULES, err),
    };
    let mut session = RewriteSession::with_rng(rules, SessionRng::seed_from_u64(0));
    bg.bench_function("generate_datetime_rule", |b| b.iter(|| rewrite_default(&mut session)));
    bg.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
