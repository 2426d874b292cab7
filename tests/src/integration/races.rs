//! # Races
//!
//! The ledger is the single serialization point: concurrent submissions
//! settle into exactly one winner and benign-duplicate receipts for the rest.

#[cfg(test)]
mod tests {
    use super::super::{random_name, world};
    use futures::future::join_all;
    use qc_18_name_service::{
        AliasStatus, ErrorCode, LocalWallet, NameServiceApi, Overrides, ReceiptStatus,
    };
    use std::sync::Arc;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_many_applicants_one_name() {
        let w = world();
        let name = random_name();
        let applicants: Vec<LocalWallet> = (0..16).map(|_| LocalWallet::random()).collect();

        let handles = applicants.iter().cloned().map(|wallet| {
            let service = Arc::clone(&w.service);
            let name = name.clone();
            let fee = w.fee();
            tokio::spawn(async move {
                service
                    .create_alias(&wallet, &name, fee, Overrides::default())
                    .await
            })
        });

        let receipts: Vec<_> = join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap().unwrap())
            .collect();

        let winners = receipts.iter().filter(|r| r.is_success()).count();
        assert_eq!(winners, 1);
        assert!(receipts
            .iter()
            .filter(|r| !r.is_success())
            .all(|r| r.error == Some(ErrorCode::Exists)));
        assert_eq!(w.ledger.with_registry(|r| r.pending_count()), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_one_applicant_many_names() {
        let w = world();
        let alice = LocalWallet::random();

        let handles = (0..16).map(|i| {
            let service = Arc::clone(&w.service);
            let wallet = alice.clone();
            let fee = w.fee();
            let name = format!("{}-{i}", random_name());
            tokio::spawn(async move {
                service
                    .create_alias(
                        &wallet,
                        &name,
                        fee,
                        Overrides {
                            nonce: Some(i),
                            memo: None,
                        },
                    )
                    .await
            })
        });

        let receipts: Vec<_> = join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap().unwrap())
            .collect();

        assert_eq!(receipts.iter().filter(|r| r.is_success()).count(), 1);
        assert!(receipts
            .iter()
            .filter(|r| r.status == ReceiptStatus::Failed)
            .all(|r| r.error == Some(ErrorCode::NotAllowed)));
        assert!(w
            .service
            .get_pending_alias(alice.address())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_approve_and_reject_race() {
        for _ in 0..8 {
            let w = world();
            let alice = LocalWallet::random();
            let name = random_name();
            w.service
                .create_alias(&alice, &name, w.fee(), Overrides::default())
                .await
                .unwrap();

            let approve = w.service.approve_alias(&name, &w.provider).await.unwrap();
            let approve = w
                .service
                .sign_alias_status_transaction(approve, &w.issuer)
                .await
                .unwrap();
            let reject = w.service.reject_alias(&name, &w.provider).await.unwrap();
            let reject = w
                .service
                .sign_alias_status_transaction(reject, &w.issuer)
                .await
                .unwrap();

            let send = |tx, nonce| {
                let service = Arc::clone(&w.service);
                let middleware = w.middleware.clone();
                tokio::spawn(async move {
                    service
                        .send_alias_status_transaction(
                            tx,
                            &middleware,
                            Overrides {
                                nonce: Some(nonce),
                                memo: None,
                            },
                        )
                        .await
                })
            };
            let approve_handle = send(approve, 0);
            let reject_handle = send(reject, 1);
            let approved = approve_handle.await.unwrap().unwrap();
            let rejected = reject_handle.await.unwrap().unwrap();

            assert_ne!(approved.is_success(), rejected.is_success());
            let loser = if approved.is_success() {
                &rejected
            } else {
                &approved
            };
            assert_eq!(loser.error, Some(ErrorCode::NotFound));

            let status = w.ledger.with_registry(|r| r.status_of(&name));
            if approved.is_success() {
                assert_eq!(status, AliasStatus::Approved);
                assert_eq!(w.service.resolve_name(&name).await.unwrap(), alice.address());
            } else {
                assert_eq!(status, AliasStatus::None);
                assert_eq!(
                    w.service
                        .lookup_address(alice.address())
                        .await
                        .unwrap_err()
                        .code(),
                    ErrorCode::NotAllowed
                );
            }
            assert!(w.ledger.with_registry(|r| r.verify_consistency()).is_ok());
        }
    }
}
