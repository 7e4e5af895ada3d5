// src/fields.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random field values for log templates
//!
//! A [`FieldProvider`] owns its RNG and an optional [`FillerPool`] of
//! precomputed message text. One provider is built per run and handed to the
//! renderer; nothing here is process-global.

use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use crate::error::Result;

const WORDS: &[&str] = &[
    "alias", "consequatur", "aut", "perferendis", "sit", "voluptatem", "accusantium",
    "doloremque", "aperiam", "eaque", "ipsa", "quae", "ab", "illo", "inventore",
    "veritatis", "et", "quasi", "architecto", "beatae", "vitae", "dicta", "sunt",
    "explicabo", "aspernatur", "odit", "fugit", "sed", "quia", "consequuntur",
    "magni", "dolores", "eos", "qui", "ratione", "sequi", "nesciunt", "neque",
    "dolorem", "ipsum", "dolor", "amet", "consectetur", "adipisci", "velit",
    "non", "numquam", "eius", "modi", "tempora", "incidunt", "ut", "labore",
    "dolore", "magnam", "aliquam", "quaerat", "enim", "ad", "minima", "veniam",
    "quis", "nostrum", "exercitationem", "ullam", "corporis", "nemo", "ipsam",
    "voluptas", "suscipit", "laboriosam", "nisi", "aliquid", "ex", "ea",
    "commodi", "autem", "vel", "eum", "iure", "reprehenderit", "in", "voluptate",
    "esse", "quam", "nihil", "molestiae", "iusto", "odio", "dignissimos",
    "ducimus", "blanditiis", "praesentium", "laudantium", "totam", "rem",
    "voluptatum", "deleniti", "atque", "corrupti", "quos", "quas", "molestias",
    "excepturi", "sint", "occaecati", "cupiditate", "provident", "perspiciatis",
    "unde", "omnis", "iste", "natus", "error", "similique", "culpa", "officia",
    "deserunt", "mollitia", "animi", "id", "est", "laborum", "dolorum", "fuga",
    "harum", "quidem", "rerum", "facilis", "expedita", "distinctio", "nam",
    "libero", "tempore", "cum", "soluta", "nobis", "eligendi", "optio",
    "cumque", "impedit", "quo", "porro", "quisquam", "minus", "maxime",
    "placeat", "facere", "possimus", "assumenda", "repellendus", "temporibus",
    "quibusdam", "illum", "fugiat", "nulla", "pariatur", "at", "vero",
    "accusamus", "officiis", "debitis", "necessitatibus", "saepe", "eveniet",
    "voluptates", "repudiandae", "recusandae", "itaque", "earum", "hic",
    "tenetur", "a", "sapiente", "delectus", "reiciendis", "voluptatibus",
    "maiores", "doloribus", "asperiores", "repellat",
];

const BS_WORDS: &[&str] = &[
    "aggregate", "architect", "benchmark", "brand", "cultivate", "deliver",
    "deploy", "disintermediate", "drive", "e-enable", "embrace", "empower",
    "enable", "engage", "engineer", "enhance", "envisioneer", "evolve",
    "expedite", "exploit", "extend", "facilitate", "generate", "grow",
    "harness", "implement", "incentivize", "incubate", "innovate", "integrate",
    "iterate", "leverage", "maximize", "mesh", "monetize", "morph", "optimize",
    "orchestrate", "productize", "redefine", "reintermediate", "reinvent",
    "repurpose", "revolutionize", "scale", "seize", "strategize", "streamline",
    "syndicate", "synergize", "synthesize", "target", "transform", "transition",
    "unleash", "utilize", "visualize", "whiteboard", "24/365", "24/7", "b2b",
    "b2c", "back-end", "best-of-breed", "bleeding-edge", "bricks-and-clicks",
    "clicks-and-mortar", "collaborative", "compelling", "cross-platform",
    "cross-media", "customized", "cutting-edge", "distributed", "dot-com",
    "dynamic", "e-business", "efficient", "end-to-end", "enterprise",
    "extensible", "frictionless", "front-end", "global", "granular",
    "holistic", "impactful", "innovative", "integrated", "interactive",
    "intuitive", "killer", "leading-edge", "magnetic", "mission-critical",
    "next-generation", "one-to-one", "open-source", "out-of-the-box",
    "plug-and-play", "proactive", "real-time", "revolutionary", "rich",
    "robust", "scalable", "seamless", "sexy", "sticky", "strategic",
    "synergistic", "transparent", "turn-key", "ubiquitous", "user-centric",
    "value-added", "vertical", "viral", "virtual", "visionary", "web-enabled",
    "wireless", "world-class", "action-items", "applications", "architectures",
    "bandwidth", "channels", "communities", "content", "convergence",
    "deliverables", "e-business", "e-commerce", "e-markets", "e-services",
    "e-tailers", "experiences", "eyeballs", "functionalities", "infomediaries",
    "infrastructures", "initiatives", "interfaces", "markets", "methodologies",
    "metrics", "mindshare", "models", "networks", "niches", "paradigms",
    "partnerships", "platforms", "portals", "relationships", "roi",
    "schemas", "solutions", "supply-chains", "synergies", "systems",
    "technologies", "users", "vortals", "web-readiness", "web services",
];

const SURNAMES: &[&str] = &[
    "Abbott", "Bartell", "Bauch", "Bechtelar", "Bernhard", "Blick", "Boyle",
    "Braun", "Brekke", "Carroll", "Cassin", "Collins", "Cormier", "Cronin",
    "Daniel", "Dare", "Dicki", "Douglas", "Durgan", "Ebert", "Effertz",
    "Emard", "Fadel", "Feeney", "Feil", "Fisher", "Frami", "Friesen",
    "Gerhold", "Gislason", "Goodwin", "Gottlieb", "Grant", "Greenfelder",
    "Hackett", "Hagenes", "Hahn", "Hamill", "Hansen", "Heaney", "Herman",
    "Hills", "Hoppe", "Howe", "Jacobs", "Jast", "Jerde", "Johns", "Kautzer",
    "Keebler", "Kemmer", "Kiehn", "Kilback", "Klein", "Koch", "Kuhn",
    "Kunze", "Larson", "Lehner", "Lind", "Lockman", "Lowe", "Marks",
    "Marvin", "Mayert", "McClure", "McDermott", "Metz", "Mills", "Mohr",
    "Monahan", "Morar", "Nader", "Nienow", "Nolan", "Okuneva", "Ondricka",
    "Pagac", "Parisian", "Pfeffer", "Pollich", "Powlowski", "Prosacco",
    "Quigley", "Rath", "Reichel", "Reilly", "Rempel", "Ritchie", "Rogahn",
    "Rolfson", "Rosenbaum", "Runte", "Sauer", "Schaden", "Schiller",
    "Schmeler", "Schowalter", "Schuster", "Shanahan", "Smitham", "Stamm",
    "Stark", "Stehr", "Stiedemann", "Swaniawski", "Terry", "Thiel",
    "Torphy", "Towne", "Tremblay", "Turcotte", "Upton", "Veum", "Volkman",
    "Walsh", "Walter", "Weimann", "Welch", "West", "White", "Wiza",
    "Wolff", "Yost", "Zboncak", "Zieme", "Zulauf",
];

const HACKER_ABBREVIATIONS: &[&str] = &[
    "TCP", "HTTP", "SDD", "RAM", "GB", "CSS", "SSL", "AGP", "SQL", "FTP", "PCI",
    "AI", "ADP", "RSS", "XML", "EXE", "COM", "HDD", "THX", "SMTP", "SMS", "USB",
    "PNG", "SAS", "IB", "SCSI", "JSON", "XSS", "JBOD",
];

const GENERAL_LEVELS: &[&str] = &["error", "warning", "info", "fatal", "trace", "debug"];

const APACHE_LEVELS: &[&str] = &[
    "emerg", "alert", "crit", "error", "warn", "notice", "info", "debug", "trace1",
    "trace2", "trace3", "trace4", "trace5", "trace6", "trace7", "trace8",
];

const HTTP_METHODS: &[&str] = &["GET", "HEAD", "POST", "PUT", "DELETE", "PATCH"];

const HTTP_VERSIONS: &[&str] = &["HTTP/1.0", "HTTP/1.1", "HTTP/2.0"];

const STATUS_CODES: &[u16] = &[
    200, 201, 202, 203, 204, 205, 206, 300, 301, 302, 303, 304, 307, 308, 400,
    401, 402, 403, 404, 405, 406, 407, 408, 409, 410, 411, 412, 413, 414, 415,
    416, 417, 418, 421, 422, 423, 424, 425, 426, 428, 429, 431, 451, 500, 501,
    502, 503, 504, 505, 506, 507, 508, 510, 511,
];

const TLDS: &[&str] = &["com", "net", "org", "io", "biz", "info", "name"];

const DOMAIN_ADJECTIVES: &[&str] = &[
    "central", "chief", "corporate", "customer", "direct", "district", "dynamic",
    "forward", "future", "global", "human", "internal", "international",
    "investor", "legacy", "lead", "national", "principal", "product",
    "regional", "senior",
];

const BROWSER_TEMPLATES: &[&str] = &[
    "Mozilla/5.0 (Windows NT {os}; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{major}.0.{build}.{patch} Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_{minor}_{patch}) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{minor}.{patch} Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:{major}.0) Gecko/20100101 Firefox/{major}.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS {minor}_{patch} like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148",
    "Opera/9.{minor} (Windows NT {os}; en-US) Presto/2.{patch}.{build} Version/{major}.00",
];

/// Which vocabulary to draw a log level from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSet {
    /// error, warning, info, fatal, trace, debug
    General,
    /// Apache `LogLevel` names, emerg through trace8
    Apache,
}

/// Build a space-joined phrase of random words truncated to `target - 1` chars
///
/// Returns an empty string when `target` is 0 or 1.
pub fn filler_phrase<R: Rng + ?Sized>(rng: &mut R, target: usize) -> String {
    if target < 1 {
        return String::new();
    }
    let mut msg = String::with_capacity(target + 16);
    msg.push_str(pick(rng, WORDS));
    while msg.len() <= target {
        msg.push(' ');
        msg.push_str(pick(rng, WORDS));
    }
    // Word lists are ASCII, so byte truncation stays on a char boundary
    msg.truncate(target - 1);
    msg
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

/// Precomputed filler phrases of a fixed width
///
/// Every entry is exactly `width - 1` bytes long, so any shorter filler is a
/// prefix slice of a random entry.
#[derive(Debug, Clone, Default)]
pub struct FillerPool {
    width: usize,
    entries: Vec<String>,
}

impl FillerPool {
    /// Build `size` entries for `width`, in parallel across `max_threads`
    ///
    /// Entry `i` is generated from `seed_base + i`, so a given seed yields the
    /// same pool regardless of thread count.
    pub fn build(
        width: usize,
        size: usize,
        seed_base: u64,
        max_threads: Option<usize>,
    ) -> Result<Self> {
        if width < 1 || size == 0 {
            tracing::debug!("Filler pool disabled (width={}, size={})", width, size);
            return Ok(Self::default());
        }

        let threads = max_threads.unwrap_or_else(num_cpus::get).max(1);
        tracing::info!(
            "Building filler pool: entries={}, width={}, threads={}",
            size,
            width,
            threads
        );

        let entry = |i: usize| {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed_base.wrapping_add(i as u64));
            filler_phrase(&mut rng, width)
        };

        let entries: Vec<String> = if threads > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            pool.install(|| (0..size).into_par_iter().map(entry).collect())
        } else {
            (0..size).map(entry).collect()
        };

        tracing::debug!("Filler pool ready: {} entries", entries.len());
        Ok(Self { width, entries })
    }

    /// Width the pool was built for
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Source of randomized semantic values for log templates
pub struct FieldProvider {
    rng: Xoshiro256PlusPlus,
    pool: FillerPool,
}

impl FieldProvider {
    /// Create a provider without a filler pool
    ///
    /// `seed = None` draws entropy from time + OS randomness.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(generate_call_entropy);
        tracing::debug!("FieldProvider seeded with {:#018x}", seed);
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            pool: FillerPool::default(),
        }
    }

    /// Attach a precomputed filler pool
    pub fn with_pool(mut self, pool: FillerPool) -> Self {
        self.pool = pool;
        self
    }

    pub fn pool(&self) -> &FillerPool {
        &self.pool
    }

    /// Uniform integer in `lo..=hi`
    pub fn number(&mut self, lo: u32, hi: u32) -> u32 {
        self.rng.random_range(lo..=hi)
    }

    pub fn word(&mut self) -> &'static str {
        pick(&mut self.rng, WORDS)
    }

    pub fn ipv4(&mut self) -> String {
        let [a, b, c, d]: [u8; 4] = self.rng.random();
        format!("{a}.{b}.{c}.{d}")
    }

    pub fn http_method(&mut self) -> &'static str {
        pick(&mut self.rng, HTTP_METHODS)
    }

    pub fn http_version(&mut self) -> &'static str {
        pick(&mut self.rng, HTTP_VERSIONS)
    }

    pub fn status_code(&mut self) -> u16 {
        STATUS_CODES[self.rng.random_range(0..STATUS_CODES.len())]
    }

    /// Surname followed by four digits, e.g. `Kuhn4821`
    pub fn username(&mut self) -> String {
        let name = pick(&mut self.rng, SURNAMES);
        let digits = self.rng.random_range(0..10_000);
        format!("{name}{digits:04}")
    }

    /// `-` or a lowercased username, with equal odds
    pub fn auth_user_id(&mut self) -> String {
        if self.rng.random_bool(0.5) {
            "-".to_string()
        } else {
            self.username().to_lowercase()
        }
    }

    /// One to four lowercased, escaped path segments: `/seamless/e-markets`
    pub fn resource_uri(&mut self) -> String {
        let segments = self.rng.random_range(1..=4);
        let mut uri = String::new();
        for _ in 0..segments {
            uri.push('/');
            uri.push_str(&query_escape(pick(&mut self.rng, BS_WORDS)));
        }
        uri.to_lowercase()
    }

    pub fn domain_name(&mut self) -> String {
        let adjective = pick(&mut self.rng, DOMAIN_ADJECTIVES);
        let noun = query_escape(pick(&mut self.rng, BS_WORDS)).replace(['%', '+'], "");
        let tld = pick(&mut self.rng, TLDS);
        format!("{adjective}{noun}.{tld}")
    }

    pub fn url(&mut self) -> String {
        let scheme = if self.rng.random_bool(0.5) { "https" } else { "http" };
        let domain = self.domain_name();
        let path = self.resource_uri();
        format!("{scheme}://www.{domain}{path}")
    }

    pub fn user_agent(&mut self) -> String {
        let template = pick(&mut self.rng, BROWSER_TEMPLATES);
        template
            .replace("{os}", pick(&mut self.rng, &["5.1", "6.1", "6.2", "10.0"]))
            .replace("{major}", &self.rng.random_range(40..=125).to_string())
            .replace("{minor}", &self.rng.random_range(5..=17).to_string())
            .replace("{build}", &self.rng.random_range(1000..=6500).to_string())
            .replace("{patch}", &self.rng.random_range(0..=200).to_string())
    }

    pub fn hacker_abbreviation(&mut self) -> &'static str {
        pick(&mut self.rng, HACKER_ABBREVIATIONS)
    }

    pub fn log_level(&mut self, set: LevelSet) -> &'static str {
        match set {
            LevelSet::General => pick(&mut self.rng, GENERAL_LEVELS),
            LevelSet::Apache => pick(&mut self.rng, APACHE_LEVELS),
        }
    }

    /// Filler text of `target - 1` bytes (empty for `target <= 1`)
    ///
    /// Served from the pool when it is wide enough, otherwise generated.
    pub fn filler(&mut self, target: usize) -> Cow<'_, str> {
        if target <= 1 {
            return Cow::Borrowed("");
        }
        if !self.pool.is_empty() && target <= self.pool.width {
            let idx = self.rng.random_range(0..self.pool.entries.len());
            return Cow::Borrowed(&self.pool.entries[idx][..target - 1]);
        }
        tracing::trace!("Filler of {} bytes generated on demand", target);
        Cow::Owned(filler_phrase(&mut self.rng, target))
    }
}

/// Escape the characters a business-speak word can carry in a URL path
fn query_escape(word: &str) -> Cow<'_, str> {
    if !word.contains(['/', ' ']) {
        return Cow::Borrowed(word);
    }
    Cow::Owned(word.replace('/', "%2F").replace(' ', "+"))
}

/// Generate per-call entropy from time + urandom
pub(crate) fn generate_call_entropy() -> u64 {
    let time_entropy = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;

    let urandom_entropy: u64 = {
        let mut rng = rand::rng();
        rng.next_u64()
    };

    time_entropy.wrapping_add(urandom_entropy)
}
