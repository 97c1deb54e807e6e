//! Concurrent redemption integration tests.
//!
//! Redemption must be at-most-once: of two concurrent exchange attempts
//! with the same valid code, exactly one succeeds and the other receives
//! the generic `invalid_request` rejection.

use std::collections::BTreeSet;
use std::sync::Arc;

use signon_protocol_oauth::{AuthorizationCodeExchanger, ExchangeConfig, OauthError};
use signon_store::InMemoryCodeStore;

fn claims() -> BTreeSet<String> {
    ["email".to_string(), "phone".to_string()].into()
}

#[tokio::test]
async fn two_concurrent_exchanges_one_winner() {
    let store = Arc::new(InMemoryCodeStore::new());
    let exchanger = Arc::new(AuthorizationCodeExchanger::new(
        store,
        ExchangeConfig::new(),
    ));

    let record = exchanger
        .issue_code("subject-1", claims(), "sector.example", false)
        .await
        .unwrap();

    let left = {
        let exchanger = exchanger.clone();
        let code = record.code.clone();
        tokio::spawn(async move { exchanger.exchange(&code).await })
    };
    let right = {
        let exchanger = exchanger.clone();
        let code = record.code.clone();
        tokio::spawn(async move { exchanger.exchange(&code).await })
    };

    let (left, right) = tokio::join!(left, right);
    let outcomes = [left.unwrap(), right.unwrap()];

    let successes = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one exchange must win");

    let failure = outcomes
        .iter()
        .find_map(|r| r.as_ref().err())
        .expect("exactly one exchange must lose");
    assert!(matches!(failure, OauthError::InvalidRequest));
}

#[tokio::test]
async fn many_concurrent_exchanges_still_one_winner() {
    let store = Arc::new(InMemoryCodeStore::new());
    let exchanger = Arc::new(AuthorizationCodeExchanger::new(
        store,
        ExchangeConfig::new(),
    ));

    let record = exchanger
        .issue_code("subject-1", claims(), "sector.example", false)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let exchanger = exchanger.clone();
        let code = record.code.clone();
        handles.push(tokio::spawn(async move { exchanger.exchange(&code).await }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn distinct_codes_do_not_contend() {
    let store = Arc::new(InMemoryCodeStore::new());
    let exchanger = Arc::new(AuthorizationCodeExchanger::new(
        store,
        ExchangeConfig::new(),
    ));

    let first = exchanger
        .issue_code("subject-1", claims(), "sector.example", false)
        .await
        .unwrap();
    let second = exchanger
        .issue_code("subject-2", claims(), "sector.example", true)
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        exchanger.exchange(&first.code),
        exchanger.exchange(&second.code)
    );
    assert!(a.is_ok());
    assert!(b.is_ok());
}
