//! End-to-end refresh-cycle tests: wiremock feeds on one side, a temp-file
//! store on the other.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use phishdb_core::FeedSource;
use phishdb_feeds::{FeedClient, FeedEndpoints, FetchStatus};
use phishdb_pipeline::{PipelineError, Refresher};
use phishdb_store::{SearchColumn, SearchMode, Store};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OPENPHISH_BODY: &str = "http://open-a.test/x\nhttp://open-b.test/y\n";

const PHISHSTATS_BODY: &str = "\
######################################################\n\
# PhishScore | PhishStats                            #\n\
# Score ranges: 0-2 likely                           #\n\
# 2-4 suspicious                                     #\n\
# 4-6 phishing                                       #\n\
# 6-10 omg phishing!                                 #\n\
# Ranges may be adjusted without notice.             #\n\
# CSV: Date,Score,URL,IP                             #\n\
######################################################\n\
\"2024-03-01 10:00:00\",\"6.5\",\"http://stats-a.test/login\",\"1.2.3.4\"\n";

const PHISHTANK_BODY: &str = "\
phish_id,url,phish_detail_url,submission_time,verified,verification_time,online,target\n\
1,http://tank-a.test/login,http://tank.test/detail/1,2024-03-01T10:00:00+00:00,yes,2024-03-01T11:00:00+00:00,yes,Some Bank\n";

fn urlhaus_zip() -> Vec<u8> {
    let csv = "\
################################################################\n\
# abuse.ch URLhaus Database Dump (CSV - recent URLs only)      #\n\
# Last updated: 2024-03-01 10:00:00 (UTC)                      #\n\
#                                                              #\n\
# Terms Of Use: https://urlhaus.abuse.ch/api/                  #\n\
# For questions please contact urlhaus [at] abuse.ch           #\n\
################################################################\n\
#\n\
# id,dateadded,url,url_status,last_online,threat,tags,urlhaus_link,reporter\n\
\"1\",\"2024-03-01 09:00:00\",\"http://haus-a.test/drop.exe\",\"online\",\"\",\"malware_download\",\"exe\",\"http://haus.test/url/1/\",\"tester\"\n";

    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    writer.start_file("csv.txt", options).unwrap();
    writer.write_all(csv.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

async fn mount_feed(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_healthy_feeds(server: &MockServer) {
    mount_feed(
        server,
        "/feed.txt",
        ResponseTemplate::new(200).set_body_string(OPENPHISH_BODY),
    )
    .await;
    mount_feed(
        server,
        "/phish_score.csv",
        ResponseTemplate::new(200).set_body_string(PHISHSTATS_BODY),
    )
    .await;
    mount_feed(
        server,
        "/data/test-key/online-valid.csv",
        ResponseTemplate::new(200).set_body_string(PHISHTANK_BODY),
    )
    .await;
    mount_feed(
        server,
        "/downloads/csv/",
        ResponseTemplate::new(200).set_body_bytes(urlhaus_zip()),
    )
    .await;
}

async fn temp_store() -> (tempfile::TempDir, Arc<Store>) {
    let dir = tempfile::tempdir().expect("tempdir should be creatable");
    let store = Store::connect(
        &dir.path().join("primary.sqlite"),
        &dir.path().join("primary.csv"),
    )
    .await
    .expect("store should connect");
    (dir, Arc::new(store))
}

fn test_client(base_url: &str) -> FeedClient {
    FeedClient::new(
        FeedEndpoints::all_at(base_url),
        5,
        "phishdb-tests/0.1",
        0,
        0,
    )
    .expect("client construction should not fail")
}

#[tokio::test]
async fn cold_start_cycle_publishes_the_deduped_fresh_batches() {
    let server = MockServer::start().await;
    mount_healthy_feeds(&server).await;
    let (_dir, store) = temp_store().await;

    let refresher = Refresher::new(test_client(&server.uri()), Arc::clone(&store));
    let report = refresher.run().await.expect("cycle should succeed");

    assert_eq!(report.prior_records, 0);
    assert_eq!(report.corpus_records, 5);
    assert_eq!(report.new_records, 5);
    assert_eq!(report.failed_sources(), 0);

    let corpus = store.load_corpus().await.unwrap();
    assert_eq!(corpus.len(), 5);
    assert!(corpus.iter().any(|r| r.url == "http://tank-a.test/login"));
}

#[tokio::test]
async fn one_failed_source_does_not_abort_the_cycle() {
    let server = MockServer::start().await;
    mount_feed(
        &server,
        "/feed.txt",
        ResponseTemplate::new(200).set_body_string(OPENPHISH_BODY),
    )
    .await;
    mount_feed(
        &server,
        "/phish_score.csv",
        ResponseTemplate::new(200).set_body_string(PHISHSTATS_BODY),
    )
    .await;
    // PhishTank times out; everything else answers.
    mount_feed(
        &server,
        "/data/test-key/online-valid.csv",
        ResponseTemplate::new(200)
            .set_body_string(PHISHTANK_BODY)
            .set_delay(Duration::from_secs(30)),
    )
    .await;
    mount_feed(
        &server,
        "/downloads/csv/",
        ResponseTemplate::new(200).set_body_bytes(urlhaus_zip()),
    )
    .await;

    let (_dir, store) = temp_store().await;
    // 2-second client timeout so the delayed mock trips it.
    let client = FeedClient::new(
        FeedEndpoints::all_at(&server.uri()),
        2,
        "phishdb-tests/0.1",
        0,
        0,
    )
    .unwrap();

    let refresher = Refresher::new(client, Arc::clone(&store));
    let report = refresher.run().await.expect("cycle should still succeed");

    assert_eq!(report.failed_sources(), 1);
    let failed: Vec<FeedSource> = report
        .sources
        .iter()
        .filter(|s| s.status == FetchStatus::Failed)
        .map(|s| s.source)
        .collect();
    assert_eq!(failed, vec![FeedSource::PhishTank]);

    // Records from the three healthy sources made it into the corpus.
    assert_eq!(report.corpus_records, 4);
    let corpus = store.load_corpus().await.unwrap();
    assert!(corpus.iter().all(|r| r.source != FeedSource::PhishTank));
}

#[tokio::test]
async fn repeated_cycles_with_unchanged_upstream_are_a_fixed_point() {
    let server = MockServer::start().await;
    mount_healthy_feeds(&server).await;
    let (_dir, store) = temp_store().await;

    let refresher = Refresher::new(test_client(&server.uri()), Arc::clone(&store));
    let first = refresher.run().await.unwrap();
    let first_corpus = store.load_corpus().await.unwrap();

    let second = refresher.run().await.unwrap();
    let second_corpus = store.load_corpus().await.unwrap();

    assert_eq!(first.corpus_records, second.corpus_records);
    assert_eq!(second.new_records, 0);
    // OpenPhish stamps a fresh generation timestamp each cycle, so compare URLs.
    let first_urls: Vec<&str> = first_corpus.iter().map(|r| r.url.as_str()).collect();
    let second_urls: Vec<&str> = second_corpus.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(first_urls, second_urls);
}

#[tokio::test]
async fn fresh_records_win_over_the_stored_corpus() {
    let server = MockServer::start().await;
    mount_healthy_feeds(&server).await;
    let (_dir, store) = temp_store().await;

    // Seed the store with a stale version of a URL the plain-list feed serves.
    let stale = phishdb_core::ThreatRecord {
        url: "http://open-a.test/x".to_string(),
        source: FeedSource::UrlHaus,
        date: None,
        notes: "stale".to_string(),
        target: "Stale Target".to_string(),
        domain: String::new(),
    };
    store.publish(&[stale]).await.unwrap();

    let refresher = Refresher::new(test_client(&server.uri()), Arc::clone(&store));
    refresher.run().await.unwrap();

    let hits = store
        .search("http://open-a.test/x", SearchColumn::Url, SearchMode::Exact)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].source, FeedSource::OpenPhish);
    assert_eq!(hits[0].notes, "Free Dataset");
}

#[tokio::test]
async fn prior_records_survive_when_a_source_stops_reporting() {
    let server = MockServer::start().await;
    mount_healthy_feeds(&server).await;
    let (_dir, store) = temp_store().await;

    let refresher = Refresher::new(test_client(&server.uri()), Arc::clone(&store));
    refresher.run().await.unwrap();

    // Second cycle: the plain-list feed no longer reports its URLs.
    server.reset().await;
    mount_feed(
        &server,
        "/feed.txt",
        ResponseTemplate::new(200).set_body_string(""),
    )
    .await;
    mount_feed(
        &server,
        "/phish_score.csv",
        ResponseTemplate::new(200).set_body_string(PHISHSTATS_BODY),
    )
    .await;
    mount_feed(
        &server,
        "/data/test-key/online-valid.csv",
        ResponseTemplate::new(200).set_body_string(PHISHTANK_BODY),
    )
    .await;
    mount_feed(
        &server,
        "/downloads/csv/",
        ResponseTemplate::new(200).set_body_bytes(urlhaus_zip()),
    )
    .await;

    let report = refresher.run().await.unwrap();

    // Grow-only: the URLs from the first cycle are still present.
    assert_eq!(report.corpus_records, 5);
    assert!(store
        .search_exists("http://open-a.test/x", SearchColumn::Url, SearchMode::Exact)
        .await
        .unwrap());
}

#[tokio::test]
async fn overlapping_refreshes_are_rejected() {
    let server = MockServer::start().await;
    // Slow feeds so the first cycle is still in flight when the second starts.
    mount_feed(
        &server,
        "/feed.txt",
        ResponseTemplate::new(200)
            .set_body_string(OPENPHISH_BODY)
            .set_delay(Duration::from_millis(750)),
    )
    .await;
    mount_feed(
        &server,
        "/phish_score.csv",
        ResponseTemplate::new(200).set_body_string(PHISHSTATS_BODY),
    )
    .await;
    mount_feed(
        &server,
        "/data/test-key/online-valid.csv",
        ResponseTemplate::new(200).set_body_string(PHISHTANK_BODY),
    )
    .await;
    mount_feed(
        &server,
        "/downloads/csv/",
        ResponseTemplate::new(200).set_body_bytes(urlhaus_zip()),
    )
    .await;

    let (_dir, store) = temp_store().await;
    let refresher = Arc::new(Refresher::new(test_client(&server.uri()), store));

    let first = {
        let refresher = Arc::clone(&refresher);
        tokio::spawn(async move { refresher.run().await })
    };
    // Give the first cycle time to take the writer lock.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let second = refresher.run().await;
    assert!(matches!(second, Err(PipelineError::RefreshInProgress)));

    let first = first.await.unwrap();
    assert!(first.is_ok());
}
