//! Integration tests for the resource accessors.
//!
//! Every accessor runs against recorded API responses in `fixtures/api.json`.

use chrono::{DateTime, Utc};
use kiva_client::{
    KivaClient, KivaError,
    filter::{JournalFilter, LenderLoanSort, LoanFilter},
    hydrate::{DateValue, TypedField},
    transport::{FixtureTransport, RecordingTransport},
};
use serde_json::{Number, json};

fn client() -> KivaClient<FixtureTransport> {
    let fixtures = FixtureTransport::from_json(include_str!("fixtures/api.json"))
        .expect("fixture document should parse");
    KivaClient::with_transport(fixtures)
}

fn utc(date: Option<&DateValue>) -> Option<DateTime<Utc>> {
    date.and_then(DateValue::to_utc)
}

fn at(text: &str) -> Option<DateTime<Utc>> {
    Some(DateTime::parse_from_rfc3339(text).expect("valid timestamp").with_timezone(&Utc))
}

#[tokio::test]
async fn test_load_lender() {
    let lenders = client().lenders(&["tim9918"]).await.unwrap();
    assert_eq!(lenders.len(), 1);

    let lender = &lenders[0];
    assert_eq!(lender.country_code.typed_str(), Some("DE"));
    assert_eq!(lender.invitee_count.typed(), Some(&3));
    assert_eq!(lender.lender_id.typed_str(), Some("tim9918"));
    assert_eq!(lender.loan_because.typed_str(), Some(""));
    assert_eq!(lender.loan_count.typed(), Some(&114));
    assert_eq!(utc(lender.member_since.as_ref()), at("2007-04-09T16:37:58Z"));
    assert_eq!(lender.name.typed_str(), Some("Tim"));
    assert_eq!(lender.occupation.typed_str(), Some("Computer Programmer"));
    assert_eq!(lender.occupational_info.typed_str(), Some(""));
    assert_eq!(lender.personal_url.typed_str(), Some("www.kuriositaet.de"));
    assert_eq!(lender.uid(), Some("tim9918"));
    assert_eq!(lender.whereabouts.typed_str(), Some("Köln"));
}

#[tokio::test]
async fn test_load_lenders_for_loan() {
    let lenders = client().lenders_for_loan(95693, None).await.unwrap();
    assert_eq!(lenders.len(), 35);

    assert_eq!(lenders[0].country_code.typed_str(), Some("US"));
    assert_eq!(lenders[0].lender_id.typed_str(), Some("eleanor1399"));
    assert_eq!(lenders[0].uid(), Some("eleanor1399"));
    assert_eq!(lenders[0].whereabouts.typed_str(), Some("Cambridge MA"));

    assert_eq!(lenders[34].country_code.typed_str(), Some("US"));
    assert_eq!(lenders[34].lender_id.typed_str(), Some("joeandchris1024"));
    assert_eq!(lenders[34].uid(), Some("joeandchris1024"));
    assert_eq!(lenders[34].name.typed_str(), Some("Joe and Chris"));
    assert_eq!(lenders[34].whereabouts.typed_str(), Some("princeton NJ"));
    assert!(lenders[34].image.is_none());
}

#[tokio::test]
async fn test_load_loans_for_lender() {
    let loans = client().loans_for_lenders(&["tim9918"], None, None).await.unwrap();
    assert_eq!(loans.len(), 20);

    let first = &loans[0];
    assert_eq!(first.activity.typed_str(), Some("Retail"));
    assert_eq!(first.description, Some(json!({"languages": ["ru", "en"]})));
    assert_eq!(first.funded_amount.typed(), Some(&Number::from(2675_u64)));
    assert_eq!(first.id.typed(), Some(&95189));
    assert_eq!(first.image, Some(json!({"template_id": 1, "id": 288221})));
    assert_eq!(
        first.location,
        Some(json!({
            "country": "Tajikistan",
            "geo": {"type": "point", "level": "town", "pairs": "40.116667 70.633333"},
            "town": "Isfara"
        }))
    );
    assert_eq!(first.name.typed_str(), Some("Saboat Artykova"));
    assert_eq!(first.partner_id.typed(), Some(&47));
    assert_eq!(utc(first.posted_date.as_ref()), at("2009-03-19T02:10:07Z"));
    assert_eq!(first.sector.typed_str(), Some("Retail"));
    assert_eq!(first.status.typed_str(), Some("funded"));
    assert_eq!(first.use_of_funds.typed_str(), Some("To expand the business"));

    let last = &loans[19];
    assert_eq!(last.activity.typed_str(), Some("Electrical Goods"));
    assert_eq!(last.description, Some(json!({"languages": ["en"]})));
    assert_eq!(last.funded_amount.typed(), Some(&Number::from(425_u64)));
    assert_eq!(last.id.typed(), Some(&79959));
    assert_eq!(last.name.typed_str(), Some("Victor Okonkwo"));
    assert_eq!(last.partner_id.typed(), Some(&20));
    assert_eq!(utc(last.posted_date.as_ref()), at("2008-12-17T15:50:11Z"));
    assert_eq!(last.status.typed_str(), Some("in_repayment"));
    assert_eq!(last.use_of_funds.typed_str(), Some("To purchase electrical materials for sell"));
}

#[tokio::test]
async fn test_loans_for_lender_sort_and_page() {
    let loans = client()
        .loans_for_lenders(&["tim9918"], Some(LenderLoanSort::Oldest), Some(1))
        .await
        .unwrap();

    assert_eq!(loans.len(), 20);
    assert_eq!(loans[0].id.typed(), Some(&79959));
    assert_eq!(loans[19].id.typed(), Some(&95189));
}

#[tokio::test]
async fn test_loans_for_lender_records() {
    let client = client();
    let lenders = client.lenders(&["tim9918"]).await.unwrap();

    let loans = client.loans_for_lender_records(&lenders, None, None).await.unwrap();
    assert_eq!(loans.len(), 20);
}

#[tokio::test]
async fn test_load_loans_by_id() {
    let loans = client().loans(&[95189, 79959]).await.unwrap();

    let ids: Vec<_> = loans.iter().map(|loan| loan.id.typed().copied()).collect();
    assert_eq!(ids, vec![Some(95189), Some(79959)]);
}

#[tokio::test]
async fn test_recent_lending_actions() {
    let actions = client().recent_lending_actions().await.unwrap();
    assert_eq!(actions.len(), 100);

    let first = &actions[0];
    assert_eq!(first.id.typed(), Some(&11_661_649));
    assert_eq!(first.lender.as_ref().and_then(|l| l.name.typed_str()), Some("Ruth"));
    assert_eq!(first.loan.as_ref().and_then(|l| l.sector.typed_str()), Some("Agriculture"));

    let last = &actions[99];
    assert_eq!(last.id.typed(), Some(&11_661_488));
    assert_eq!(last.lender.as_ref().and_then(|l| l.name.typed_str()), Some("James McGovern"));
    assert_eq!(last.loan.as_ref().and_then(|l| l.sector.typed_str()), Some("Clothing"));

    for action in &actions {
        assert!(action.date.as_ref().is_some_and(DateValue::is_parsed));
        let lender = action.lender.as_ref().expect("every action has a lender");
        assert!(lender.member_since.as_ref().is_some_and(DateValue::is_parsed));
    }
}

#[tokio::test]
async fn test_journal_entry_and_comments() {
    let client = client();
    let mut entries = client.journal_entries(14077, None, None).await.unwrap();
    assert_eq!(entries.len(), 1);

    let entry = &mut entries[0];
    assert_eq!(entry.author.typed_str(), Some("Luis Crespo"));
    assert_eq!(entry.bulk.typed(), Some(&false));
    assert_eq!(entry.comment_count.typed(), Some(&1));
    assert!(!entry.has_comments_loaded());

    let comments = client.load_comments(entry).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].id.typed(), Some(&16958));
    assert_eq!(comments[0].author.typed_str(), Some("Janet and Marty"));
    assert_eq!(comments[0].body.typed_str(), Some("Dear Dona Isabel,\r\n\r\n"));
    assert_eq!(utc(comments[0].date.as_ref()), at("2007-07-18T16:52:53Z"));
    assert_eq!(comments[0].whereabouts.typed_str(), Some("San Francisco, California, USA"));
    assert!(entry.has_comments_loaded());
}

#[tokio::test]
async fn test_load_comments_is_cached() {
    let client = client();
    let mut entry = client.journal_entries(14077, None, None).await.unwrap().remove(0);
    client.load_comments(&mut entry).await.unwrap();

    // A client with no fixtures would fail if the second call reached the transport.
    let offline = KivaClient::with_transport(FixtureTransport::new());
    let cached = offline.load_comments(&mut entry).await.unwrap();
    assert_eq!(cached.len(), 1);

    let error = offline.comments(10253).await.unwrap_err();
    assert!(matches!(error, KivaError::FixtureNotFound(_)));
}

#[tokio::test]
async fn test_journal_entries_page_and_bulk() {
    let entries = client().journal_entries(14077, Some(2), Some(true)).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_search_journal_entries() {
    let client = client();
    let filter = JournalFilter::new().media_any();
    let mut entries = client.search_journal_entries(&filter, None).await.unwrap();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].bulk.typed(), Some(&true));
    assert!(entries[0].image.is_some());
    assert_eq!(entries[1].date, Some(DateValue::Raw(json!("sometime in March"))));

    let comments = client.load_comments(&mut entries[0]).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1].author.typed_str(), Some("Ben"));
    assert!(comments[1].whereabouts.is_none());
}

#[tokio::test]
async fn test_partners() {
    let partners = client().partners(None).await.unwrap();
    assert_eq!(partners.len(), 109);

    assert_eq!(partners[0].default_rate.typed().and_then(Number::as_f64), Some(0.0));
    assert_eq!(partners[0].id.typed(), Some(&128));
    assert_eq!(partners[0].loans_posted.typed(), Some(&99));
    assert_eq!(
        partners[0].name.typed_str(),
        Some("Hagdan sa Pag-uswag Foundation, Inc. (HSPFI)")
    );
    assert_eq!(utc(partners[0].start_date.as_ref()), at("2008-09-18T17:00:05Z"));

    let last = &partners[108];
    assert_eq!(last.countries.as_ref().and_then(|c| c.as_array()).map(Vec::len), Some(3));
    assert_eq!(
        last.default_rate.typed().and_then(Number::as_f64),
        Some(9.191_729_323_308_3)
    );
    assert_eq!(last.id.typed(), Some(&1));
    assert_eq!(last.status.typed_str(), Some("closed"));
    assert_eq!(utc(last.start_date.as_ref()), at("2005-03-01T00:00:00Z"));
}

#[tokio::test]
async fn test_image_templates() {
    let templates = client().image_templates().await.unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].id.typed(), Some(&1));
    assert_eq!(templates[0].pattern.typed_str(), Some("http://www.kiva.org/img/<size>/<id>.jpg"));
    assert_eq!(
        templates[0].url_for(288_221, "w80h80").as_deref(),
        Some("http://www.kiva.org/img/w80h80/288221.jpg")
    );
}

#[tokio::test]
async fn test_current_release() {
    let release = client().current_release().await.unwrap();
    assert_eq!(release.id.typed_str(), Some("13775"));
    assert_eq!(utc(release.date.as_ref()), at("2009-03-19T01:20:37Z"));
}

#[tokio::test]
async fn test_search_loans() {
    let filter = LoanFilter::new().male().africa();
    let loans = client().search_loans(&filter, None).await.unwrap();

    assert_eq!(loans.len(), 3);
    assert!(loans.iter().all(|loan| loan.status.typed_str() == Some("fundraising")));
    assert!(loans.iter().all(|loan| loan.basket_amount.is_none()));
}

#[tokio::test]
async fn test_search_loans_unrecorded_query() {
    let filter = LoanFilter::new().female().africa();
    let result = client().search_loans(&filter, None).await;

    let expected = "/loans/search.json?gender=female&region=af";
    assert!(matches!(result, Err(KivaError::FixtureNotFound(key)) if key == expected));
}

#[tokio::test]
async fn test_newest_loans_page() {
    let loans = client().newest_loans(Some(2)).await.unwrap();
    assert_eq!(loans.len(), 2);

    let result = client().newest_loans(None).await;
    assert!(matches!(result, Err(KivaError::FixtureNotFound(_))));
}

#[tokio::test]
async fn test_recording_then_replaying_yields_identical_records() {
    let recorder = RecordingTransport::new(
        FixtureTransport::from_json(include_str!("fixtures/api.json")).unwrap(),
    );
    let live = KivaClient::with_transport(recorder);

    let partners = live.partners(None).await.unwrap();
    let actions = live.recent_lending_actions().await.unwrap();

    let replay = KivaClient::with_transport(live.into_transport().into_fixtures());
    assert_eq!(replay.transport().len(), 2);
    assert_eq!(replay.partners(None).await.unwrap(), partners);
    assert_eq!(replay.recent_lending_actions().await.unwrap(), actions);
}
