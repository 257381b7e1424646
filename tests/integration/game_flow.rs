//! End-to-end game flows through the registry.

use coolstuff::config::GameSettings;
use coolstuff::types::{ActionRequest, GameError, Phase};

use crate::fixtures::{self, ITEM_VALUE};

#[tokio::test]
async fn host_wins_first_round_then_advances() {
    let reg = fixtures::registry();
    let (code, host) = reg.create("ABCD", "Host").await.unwrap();
    let (_, alice) = reg.join(&code, "Alice").await.unwrap();
    reg.start(&code).await.unwrap();

    reg.submit_action(&code, &host.id, ActionRequest::bid(50))
        .await
        .unwrap();
    let resolved = reg
        .submit_action(&code, &alice.id, ActionRequest::sit_out())
        .await
        .unwrap();
    assert!(resolved);

    let view = reg.view(&code, Some(&host.id)).await.unwrap();
    assert_eq!(view.phase, Phase::Reveal);
    assert_eq!(view.my_budget, Some(950));
    assert_eq!(view.my_collection.len(), 1);
    assert_eq!(view.my_collection[0].value, ITEM_VALUE);
    let reveal = view.resolved.unwrap();
    assert_eq!(reveal.winner_name.as_deref(), Some("Host"));
    assert_eq!(reveal.item_value, ITEM_VALUE);

    reg.advance(&code).await.unwrap();
    let view = reg.view(&code, Some(&alice.id)).await.unwrap();
    assert_eq!(view.current_round, 1);
    assert_eq!(view.phase, Phase::Play);
    assert!(view.resolved.is_none());
    assert!(!view.all_submitted);
}

#[tokio::test]
async fn sole_over_budget_bid_is_rejected() {
    let reg = fixtures::registry();
    let (code, host) = reg.create("ABCD", "Host").await.unwrap();
    reg.join(&code, "Alice").await.unwrap();
    reg.start(&code).await.unwrap();

    let err = reg
        .submit_action(&code, &host.id, ActionRequest::bid(1001))
        .await
        .unwrap_err();
    assert_eq!(err, GameError::InvalidBid);

    let view = reg.view(&code, Some(&host.id)).await.unwrap();
    assert!(!view.has_submitted);
    assert!(!view.all_submitted);
    assert_eq!(view.submitted_count, 0);
    assert_eq!(view.my_budget, Some(1000));
}

#[tokio::test]
async fn nobody_bids_item_is_discarded() {
    let reg = fixtures::registry();
    let (code, host) = reg.create("ABCD", "Host").await.unwrap();
    let (_, alice) = reg.join(&code, "Alice").await.unwrap();
    reg.start(&code).await.unwrap();

    let before = reg.view(&code, None).await.unwrap().leaderboard;
    reg.submit_action(&code, &host.id, ActionRequest::sit_out())
        .await
        .unwrap();
    reg.submit_action(&code, &alice.id, ActionRequest::sit_out())
        .await
        .unwrap();

    let view = reg.view(&code, None).await.unwrap();
    assert_eq!(view.phase, Phase::Reveal);
    assert_eq!(view.resolved.unwrap().winner_name, None);
    assert_eq!(view.leaderboard, before);
}

#[tokio::test]
async fn duplicate_submission_fails() {
    let reg = fixtures::registry();
    let (code, host) = reg.create("ABCD", "Host").await.unwrap();
    reg.join(&code, "Alice").await.unwrap();
    reg.start(&code).await.unwrap();

    reg.submit_action(&code, &host.id, ActionRequest::bid(10))
        .await
        .unwrap();
    let before = reg.view(&code, Some(&host.id)).await.unwrap();
    let err = reg
        .submit_action(&code, &host.id, ActionRequest::sit_out())
        .await
        .unwrap_err();
    assert_eq!(err, GameError::AlreadySubmitted);
    assert_eq!(reg.view(&code, Some(&host.id)).await.unwrap(), before);
}

#[tokio::test]
async fn force_resolve_waits_for_everyone() {
    let reg = fixtures::registry();
    let (code, host) = reg.create("ABCD", "Host").await.unwrap();
    reg.join(&code, "Alice").await.unwrap();

    assert_eq!(reg.force_resolve(&code).await, Err(GameError::WrongPhase));
    reg.start(&code).await.unwrap();
    reg.submit_action(&code, &host.id, ActionRequest::bid(10))
        .await
        .unwrap();
    assert_eq!(
        reg.force_resolve(&code).await,
        Err(GameError::NotAllSubmitted)
    );
}

#[tokio::test]
async fn host_advance_drives_whole_game_to_end() {
    let settings = GameSettings {
        rounds: 3,
        ..GameSettings::default()
    };
    let reg = fixtures::registry_with(settings);
    let (code, host) = reg.create("ABCD", "Host").await.unwrap();
    let (_, alice) = reg.join(&code, "Alice").await.unwrap();

    reg.host_advance(&code).await.unwrap();
    for round in 0..3 {
        let view = reg.view(&code, None).await.unwrap();
        assert_eq!(view.current_round, round);
        assert_eq!(
            reg.host_advance(&code).await,
            Err(GameError::NothingToAdvance)
        );

        reg.submit_action(&code, &alice.id, ActionRequest::bid(200))
            .await
            .unwrap();
        reg.submit_action(&code, &host.id, ActionRequest::bid(200))
            .await
            .unwrap();
        reg.host_advance(&code).await.unwrap();
    }

    let view = reg.view(&code, Some(&alice.id)).await.unwrap();
    assert_eq!(view.phase, Phase::Ended);
    assert_eq!(view.current_round, 3);
    assert_eq!(view.my_budget, Some(400));
    assert_eq!(view.leaderboard[0].name, "Alice");
    assert_eq!(view.leaderboard[0].total_value, 3 * ITEM_VALUE);

    assert_eq!(
        reg.submit_action(&code, &host.id, ActionRequest::bid(1)).await,
        Err(GameError::WrongPhase)
    );
    assert_eq!(
        reg.host_advance(&code).await,
        Err(GameError::NothingToAdvance)
    );
    assert_eq!(reg.join(&code, "Late").await.unwrap_err(), GameError::NotJoinable);
}

#[tokio::test]
async fn selling_credits_three_quarters() {
    let reg = fixtures::registry();
    let (code, host) = reg.create("ABCD", "Host").await.unwrap();
    let (_, alice) = reg.join(&code, "Alice").await.unwrap();
    reg.start(&code).await.unwrap();

    reg.submit_action(&code, &host.id, ActionRequest::bid(80))
        .await
        .unwrap();
    reg.submit_action(&code, &alice.id, ActionRequest::sit_out())
        .await
        .unwrap();
    reg.advance(&code).await.unwrap();

    reg.submit_action(&code, &host.id, ActionRequest::sell(0))
        .await
        .unwrap();
    reg.submit_action(&code, &alice.id, ActionRequest::sit_out())
        .await
        .unwrap();

    let view = reg.view(&code, Some(&host.id)).await.unwrap();
    assert_eq!(view.my_budget, Some(1000 - 80 + 75));
    assert!(view.my_collection.is_empty());
    assert_eq!(view.resolved.unwrap().winner_name, None);
}
