//! Integration tests for the crawler
//!
//! Most tests crawl in-memory page graphs so that every fetch can be counted.
//! The last tests go through the real HTTP page source, against local files
//! and a wiremock server.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use word_tally::config::{CrawlerConfig, FetchFailurePolicy};
use word_tally::page::{HttpPageSource, PageData, PageSource};
use word_tally::profiler::Profiler;
use word_tally::url::PatternSet;
use word_tally::{CrawlError, FakeClock, FetchError, ParallelCrawler, SystemClock, WebCrawler};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// In-memory page graph that counts how often each URL is fetched
#[derive(Default)]
struct GraphSource {
    pages: HashMap<String, PageData>,
    fetch_counts: Mutex<HashMap<String, usize>>,
}

impl GraphSource {
    fn page(mut self, url: &str, words: &[(&str, u64)], links: &[&str]) -> Self {
        self.pages.insert(
            url.to_string(),
            PageData {
                word_counts: words.iter().map(|(w, c)| (w.to_string(), *c)).collect(),
                links: links.iter().map(|l| l.to_string()).collect(),
            },
        );
        self
    }

    fn fetches_of(&self, url: &str) -> usize {
        self.fetch_counts.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    fn total_fetches(&self) -> usize {
        self.fetch_counts.lock().unwrap().values().sum()
    }

    /// Distinct URLs reachable from `seeds` within `max_depth` hops, skipping excluded ones
    fn reachable(&self, seeds: &[String], max_depth: u32, excluded: &PatternSet) -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut queue: VecDeque<(String, u32)> = seeds.iter().map(|s| (s.clone(), max_depth)).collect();

        while let Some((url, depth)) = queue.pop_front() {
            if depth == 0 || excluded.matches(&url) || !seen.insert(url.clone()) {
                continue;
            }
            if let Some(page) = self.pages.get(&url) {
                for link in &page.links {
                    queue.push_back((link.clone(), depth - 1));
                }
            }
        }

        seen
    }
}

impl PageSource for GraphSource {
    fn fetch(&self, url: &str) -> Result<PageData, FetchError> {
        *self
            .fetch_counts
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        // Give sibling tasks a chance to race each other
        std::thread::sleep(Duration::from_millis(1));

        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Creates a test configuration with the given depth and parallelism
fn create_test_config(max_depth: u32, parallelism: usize) -> CrawlerConfig {
    CrawlerConfig {
        max_depth,
        parallelism,
        timeout_seconds: 30,
        popular_word_count: 100,
        ..CrawlerConfig::default()
    }
}

fn seeds(urls: &[&str]) -> Vec<String> {
    urls.iter().map(|u| u.to_string()).collect()
}

fn as_map(word_counts: &[(String, u64)]) -> HashMap<String, u64> {
    word_counts.iter().cloned().collect()
}

/// A tangled graph with cycles, shared targets and a dead end
fn tangled_graph() -> GraphSource {
    GraphSource::default()
        .page("a", &[("alpha", 3), ("common", 1)], &["b", "c", "d"])
        .page("b", &[("beta", 2), ("common", 1)], &["a", "c", "e"])
        .page("c", &[("gamma", 5), ("common", 1)], &["d", "e", "f"])
        .page("d", &[("delta", 1), ("common", 1)], &["a", "f"])
        .page("e", &[("epsilon", 4), ("common", 1)], &["b", "g"])
        .page("f", &[("phi", 2), ("common", 1)], &["g", "h"])
        .page("g", &[("gamma", 1), ("common", 1)], &["a"])
        .page("h", &[("eta", 7), ("common", 1)], &[])
}

#[test]
fn test_back_link_is_not_refetched() {
    let source = Arc::new(
        GraphSource::default()
            .page("A", &[("x", 1)], &["B"])
            .page("B", &[("x", 1), ("y", 1)], &["A"]),
    );
    let crawler =
        ParallelCrawler::new(&create_test_config(2, 4), source.clone(), Arc::new(SystemClock)).unwrap();

    let result = crawler.crawl(&seeds(&["A"])).unwrap();

    assert_eq!(result.urls_visited, 2);
    assert_eq!(
        result.word_counts,
        vec![("x".to_string(), 2), ("y".to_string(), 1)]
    );
    assert_eq!(source.fetches_of("A"), 1);
    assert_eq!(source.fetches_of("B"), 1);
}

#[test]
fn test_zero_depth_visits_nothing() {
    let source = Arc::new(tangled_graph());
    let crawler =
        ParallelCrawler::new(&create_test_config(0, 4), source.clone(), Arc::new(SystemClock)).unwrap();

    let result = crawler.crawl(&seeds(&["a", "b"])).unwrap();

    assert_eq!(result.urls_visited, 0);
    assert!(result.word_counts.is_empty());
    assert_eq!(source.total_fetches(), 0);
}

#[test]
fn test_excluded_seed_is_never_visited() {
    let source = Arc::new(
        GraphSource::default()
            .page("http://site/blocked", &[("secret", 1)], &["http://site/open"])
            .page("http://site/open", &[("public", 1)], &["http://site/blocked"]),
    );
    let config = CrawlerConfig {
        ignored_urls: vec!["http://site/blocked".to_string()],
        ..create_test_config(5, 4)
    };
    let crawler = ParallelCrawler::new(&config, source.clone(), Arc::new(SystemClock)).unwrap();

    let result = crawler
        .crawl(&seeds(&["http://site/blocked", "http://site/open"]))
        .unwrap();

    assert_eq!(result.urls_visited, 1);
    assert_eq!(result.word_counts, vec![("public".to_string(), 1)]);
    assert_eq!(source.fetches_of("http://site/blocked"), 0);
}

#[test]
fn test_shared_target_is_fetched_once() {
    let source = Arc::new(
        GraphSource::default()
            .page("s1", &[("one", 1)], &["shared"])
            .page("s2", &[("two", 1)], &["shared"])
            .page("shared", &[("both", 1)], &[]),
    );
    let crawler =
        ParallelCrawler::new(&create_test_config(3, 4), source.clone(), Arc::new(SystemClock)).unwrap();

    let result = crawler.crawl(&seeds(&["s1", "s2"])).unwrap();

    assert_eq!(result.urls_visited, 3);
    assert_eq!(source.fetches_of("shared"), 1);
    assert_eq!(as_map(&result.word_counts)["both"], 1);
}

#[test]
fn test_serial_and_parallel_tallies_match() {
    let start = seeds(&["a", "e"]);

    let serial_source = Arc::new(tangled_graph());
    let serial = ParallelCrawler::new(&create_test_config(4, 1), serial_source, Arc::new(SystemClock))
        .unwrap()
        .crawl(&start)
        .unwrap();

    let parallel_source = Arc::new(tangled_graph());
    let parallel_crawler =
        ParallelCrawler::new(&create_test_config(4, 8), parallel_source.clone(), Arc::new(SystemClock))
            .unwrap();

    for _ in 0..5 {
        let parallel = parallel_crawler.crawl(&start).unwrap();
        assert_eq!(parallel.urls_visited, serial.urls_visited);
        assert_eq!(as_map(&parallel.word_counts), as_map(&serial.word_counts));
    }

    // Every crawl starts from an empty visited set, so each page is fetched once per crawl
    assert_eq!(parallel_source.fetches_of("a"), 5);
}

#[test]
fn test_tally_is_sum_over_visited_pages() {
    let source = Arc::new(tangled_graph());
    let crawler =
        ParallelCrawler::new(&create_test_config(8, 4), source.clone(), Arc::new(SystemClock)).unwrap();

    let result = crawler.crawl(&seeds(&["a"])).unwrap();
    let tally = as_map(&result.word_counts);

    // All 8 pages are reachable within 8 hops; "common" appears once on each
    assert_eq!(result.urls_visited, 8);
    assert_eq!(tally["common"], 8);
    assert_eq!(tally["gamma"], 6);
    assert_eq!(tally["eta"], 7);
}

#[test]
fn test_visited_never_exceeds_reachable() {
    let graph = tangled_graph();
    let excluded = PatternSet::new(&["c|f"]).unwrap();
    let start = seeds(&["a"]);

    for max_depth in 0..5 {
        let expected = graph.reachable(&start, max_depth, &excluded);

        let config = CrawlerConfig {
            ignored_urls: vec!["c|f".to_string()],
            ..create_test_config(max_depth, 4)
        };
        let source = Arc::new(tangled_graph());
        let crawler = ParallelCrawler::new(&config, source.clone(), Arc::new(SystemClock)).unwrap();
        let result = crawler.crawl(&start).unwrap();

        assert!(result.urls_visited <= expected.len());
        assert_eq!(source.fetches_of("c"), 0);
        assert_eq!(source.fetches_of("f"), 0);
    }
}

#[test]
fn test_popular_word_count_limits_result() {
    let source = Arc::new(tangled_graph());
    let config = CrawlerConfig {
        popular_word_count: 2,
        ..create_test_config(8, 4)
    };
    let crawler = ParallelCrawler::new(&config, source, Arc::new(SystemClock)).unwrap();

    let result = crawler.crawl(&seeds(&["a"])).unwrap();

    assert_eq!(
        result.word_counts,
        vec![("common".to_string(), 8), ("eta".to_string(), 7)]
    );
}

#[test]
fn test_fetch_failure_aborts_by_default() {
    let source = Arc::new(GraphSource::default().page("a", &[("x", 1)], &["missing"]));
    let crawler = ParallelCrawler::new(&create_test_config(3, 2), source, Arc::new(SystemClock)).unwrap();

    let result = crawler.crawl(&seeds(&["a"]));

    assert!(matches!(result, Err(CrawlError::Fetch(_))));
}

#[test]
fn test_fetch_failure_can_be_skipped() {
    let source = Arc::new(
        GraphSource::default()
            .page("a", &[("x", 1)], &["missing", "b"])
            .page("b", &[("x", 2)], &[]),
    );
    let config = CrawlerConfig {
        fetch_failure_policy: FetchFailurePolicy::Skip,
        ..create_test_config(3, 2)
    };
    let crawler = ParallelCrawler::new(&config, source, Arc::new(SystemClock)).unwrap();

    let result = crawler.crawl(&seeds(&["a"])).unwrap();

    assert_eq!(result.urls_visited, 3);
    assert_eq!(result.word_counts, vec![("x".to_string(), 3)]);
}

#[test]
fn test_profiled_crawl_records_both_capabilities() {
    let clock = Arc::new(FakeClock::default());
    let profiler = Profiler::new(clock.clone());

    let source = profiler
        .wrap::<dyn PageSource, _>(tangled_graph())
        .expect("page source wraps");
    let crawler = profiler
        .wrap::<dyn WebCrawler, _>(
            ParallelCrawler::new(&create_test_config(2, 4), Arc::new(source), clock.clone()).unwrap(),
        )
        .expect("crawler wraps");

    let result = crawler.crawl(&seeds(&["a"])).unwrap();
    assert_eq!(crawler.max_parallelism(), crawler.delegate().max_parallelism());

    let keys: Vec<String> = profiler
        .state()
        .snapshot()
        .into_iter()
        .map(|(key, _)| key.to_string())
        .collect();
    assert_eq!(keys.len(), 2);
    assert!(keys.iter().any(|k| k.ends_with("GraphSource#fetch(&str)")));
    assert!(keys.iter().any(|k| k.ends_with("ParallelCrawler#crawl(&[String])")));
    assert!(!keys.iter().any(|k| k.contains("max_parallelism")));
    assert_eq!(result.urls_visited, 4);

    let mut report = Vec::new();
    profiler.write_report(&mut report).unwrap();
    let report = String::from_utf8(report).unwrap();
    assert!(report.starts_with("Run at "));
    assert_eq!(report.lines().filter(|l| l.contains(" took ")).count(), 2);
}

#[test]
fn test_crawl_local_files() {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, body: &str| {
        std::fs::write(
            dir.path().join(name),
            format!("<html><head><title>{}</title></head><body>{}</body></html>", name, body),
        )
        .unwrap();
    };

    write("index.html", r#"Rust crawler <a href="second.html">next</a> <a href="private.html">hidden</a>"#);
    write("second.html", r#"Rust again <a href="index.html">home</a> <a href="missing.html">gone</a>"#);
    write("private.html", "secret words");

    let index = url::Url::from_file_path(dir.path().join("index.html")).unwrap();
    let config = CrawlerConfig {
        ignored_urls: vec![".*/private\\.html".to_string()],
        ignored_words: vec!["next|hidden|home|gone".to_string()],
        fetch_failure_policy: FetchFailurePolicy::Skip,
        ..create_test_config(3, 2)
    };

    let source = HttpPageSource::new(config.timeout(), PatternSet::new(&config.ignored_words).unwrap())
        .unwrap();
    let crawler = ParallelCrawler::new(&config, Arc::new(source), Arc::new(SystemClock)).unwrap();
    let result = crawler.crawl(&[index.to_string()]).unwrap();
    let tally = as_map(&result.word_counts);

    // index, second and the missing page (skipped after its failed fetch)
    assert_eq!(result.urls_visited, 3);
    assert_eq!(tally["rust"], 2);
    assert_eq!(tally["crawler"], 1);
    assert_eq!(tally["again"], 1);
    assert!(!tally.contains_key("secret"));
    assert!(!tally.contains_key("next"));
}

#[tokio::test]
async fn test_crawl_over_http() {
    // Start a mock server
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Mock index page with links
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(
                    r#"<html><body>
                    Welcome home
                    <a href="{}/page1">Page</a>
                    <a href="/page2">Page</a>
                    </body></html>"#,
                    base_url
                ))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // Mock page1, linking back home
    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body>Welcome to page one <a href="/">home</a></body></html>"#)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // Mock page2 (excluded, should never be called)
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>nope</body></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = CrawlerConfig {
        ignored_urls: vec![".*/page2".to_string()],
        ..create_test_config(3, 2)
    };
    let start = vec![format!("{}/", base_url)];

    // The crawler owns a runtime and a blocking client, so run it on a plain thread
    let result = std::thread::spawn(move || {
        let source = HttpPageSource::new(config.timeout(), PatternSet::default()).unwrap();
        let crawler = ParallelCrawler::new(&config, Arc::new(source), Arc::new(SystemClock)).unwrap();
        crawler.crawl(&start)
    })
    .join()
    .expect("crawl thread panicked")
    .expect("Crawl failed");

    let tally = as_map(&result.word_counts);
    assert_eq!(result.urls_visited, 2);
    assert_eq!(tally["welcome"], 2);
    assert_eq!(tally["home"], 2);
    assert_eq!(tally["page"], 3);
    assert_eq!(tally["to"], 1);
    assert_eq!(tally["one"], 1);

    // Wiremock verifies the expectations when mock_server drops
}

#[tokio::test]
async fn test_http_error_status_aborts_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(2, 2);
    let start = vec![format!("{}/", mock_server.uri())];

    let result = std::thread::spawn(move || {
        let source = HttpPageSource::new(config.timeout(), PatternSet::default()).unwrap();
        let crawler = ParallelCrawler::new(&config, Arc::new(source), Arc::new(SystemClock)).unwrap();
        crawler.crawl(&start)
    })
    .join()
    .expect("crawl thread panicked");

    assert!(matches!(
        result,
        Err(CrawlError::Fetch(FetchError::Status { status: 500, .. }))
    ));
}
