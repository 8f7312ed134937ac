//! tests/checkin_tests.rs
//! Workflow completo contra la API falsa.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_rt::test;

    use crate::models::checkin_model::NOT_LOGGED_IN_STATUS;
    use crate::tests::support::{
        checkin_service, fake_services, memory_store, start_fake_api, FakeApi, TEST_USER_AGENT,
    };

    const V2_COOKIES: &str = "ltuid_v2=10001; ltoken_v2=v2_token_abc";

    fn is_clock(s: &str) -> bool {
        let b = s.as_bytes();
        b.len() == 5
            && b[2] == b':'
            && b[..2].iter().all(u8::is_ascii_digit)
            && b[3..].iter().all(u8::is_ascii_digit)
    }

    #[test]
    async fn test_both_success_notifies() {
        let api = Arc::new(FakeApi::default());
        let base = start_fake_api(api.clone());
        api.respond_retcode("genshin", 0);
        api.respond_retcode("starrail", 0);

        let store = memory_store().await;
        let service = checkin_service(
            fake_services(&base),
            V2_COOKIES,
            store.clone(),
            Some(format!("{}/webhook", base)),
        );

        let report = service.perform_check_in().await.expect("run");
        assert_eq!(
            report.status.status_text,
            "Genshin Impact: ✅ Success | Honkai: Star Rail: ✅ Success"
        );
        assert!(is_clock(&report.status.last_check_time));
        assert!(report.notified);

        let stored = store.read().await.unwrap().expect("status guardado");
        assert_eq!(stored, report.status);

        let hooks = api.webhooks();
        assert_eq!(hooks.len(), 1);
        assert_eq!(hooks[0]["title"], "HoyoDaily Report");
        assert_eq!(hooks[0]["message"], report.status.status_text.as_str());
        assert_eq!(hooks[0]["priority"], 2);
    }

    #[test]
    async fn test_both_already_claimed_stays_silent() {
        let api = Arc::new(FakeApi::default());
        let base = start_fake_api(api.clone());
        api.respond_retcode("genshin", -5003);
        api.respond_retcode("starrail", -5003);

        let service = checkin_service(
            fake_services(&base),
            V2_COOKIES,
            memory_store().await,
            Some(format!("{}/webhook", base)),
        );

        let report = service.perform_check_in().await.expect("run");
        assert_eq!(
            report.status.status_text,
            "Genshin Impact: ✅ | Honkai: Star Rail: ✅"
        );
        assert!(!report.notified);
        assert!(api.webhooks().is_empty());
    }

    #[test]
    async fn test_mixed_success_and_claimed_notifies() {
        let api = Arc::new(FakeApi::default());
        let base = start_fake_api(api.clone());
        api.respond_retcode("genshin", -5003);
        api.respond_retcode("starrail", 0);

        let service = checkin_service(
            fake_services(&base),
            V2_COOKIES,
            memory_store().await,
            Some(format!("{}/webhook", base)),
        );

        let report = service.perform_check_in().await.expect("run");
        assert_eq!(
            report.status.status_text,
            "Genshin Impact: ✅ | Honkai: Star Rail: ✅ Success"
        );
        assert!(report.notified);
        assert_eq!(api.webhooks().len(), 1);
    }

    #[test]
    async fn test_api_error_carries_retcode() {
        let api = Arc::new(FakeApi::default());
        let base = start_fake_api(api.clone());
        api.respond_retcode("genshin", -100);
        api.respond_retcode("starrail", -5003);

        let service = checkin_service(fake_services(&base), V2_COOKIES, memory_store().await, None);

        let report = service.perform_check_in().await.expect("run");
        assert_eq!(
            report.status.status_text,
            "Genshin Impact: ❌ Err(-100) | Honkai: Star Rail: ✅"
        );
        assert!(report.notified);
    }

    #[test]
    async fn test_transport_failure_is_net_err_and_does_not_stop_others() {
        let api = Arc::new(FakeApi::default());
        let base = start_fake_api(api.clone());
        api.respond_retcode("starrail", 0);

        let mut services = fake_services(&base);
        // nadie escucha en el puerto 1
        services[0].request_url = "http://127.0.0.1:1/sign/genshin".to_string();

        let service = checkin_service(
            services,
            V2_COOKIES,
            memory_store().await,
            Some(format!("{}/webhook", base)),
        );

        let report = service.perform_check_in().await.expect("run");
        assert_eq!(
            report.status.status_text,
            "Genshin Impact: ❌ NetErr | Honkai: Star Rail: ✅ Success"
        );
        assert!(report.notified);
        assert_eq!(api.claims().len(), 1);
        assert_eq!(api.webhooks().len(), 1);
    }

    #[test]
    async fn test_dead_webhook_does_not_abort_run() {
        let api = Arc::new(FakeApi::default());
        let base = start_fake_api(api.clone());
        api.respond_retcode("genshin", 0);
        api.respond_retcode("starrail", 0);

        let store = memory_store().await;
        let service = checkin_service(
            fake_services(&base),
            V2_COOKIES,
            store.clone(),
            Some("http://127.0.0.1:1/hook".to_string()),
        );

        let report = service.perform_check_in().await.expect("run");
        assert!(report.notified);

        let stored = store.read().await.unwrap().expect("status guardado");
        assert_eq!(
            stored.status_text,
            "Genshin Impact: ✅ Success | Honkai: Star Rail: ✅ Success"
        );
        assert!(is_clock(&stored.last_check_time));
        assert_eq!(api.claims().len(), 2);
    }

    #[test]
    async fn test_unparseable_body_is_net_err() {
        let api = Arc::new(FakeApi::default());
        let base = start_fake_api(api.clone());
        api.respond_raw("genshin", "<html>bad gateway</html>");
        api.respond_raw("starrail", r#"{"message":"no retcode"}"#);

        let service = checkin_service(fake_services(&base), V2_COOKIES, memory_store().await, None);

        let report = service.perform_check_in().await.expect("run");
        assert_eq!(
            report.status.status_text,
            "Genshin Impact: ❌ NetErr | Honkai: Star Rail: ❌ NetErr"
        );
    }

    #[test]
    async fn test_not_logged_in_halts_and_notifies() {
        let api = Arc::new(FakeApi::default());
        let base = start_fake_api(api.clone());

        let store = memory_store().await;
        let service = checkin_service(
            fake_services(&base),
            "ltuid_v2=10001",
            store.clone(),
            Some(format!("{}/webhook", base)),
        );

        let report = service.perform_check_in().await.expect("run");
        assert_eq!(report.status.status_text, NOT_LOGGED_IN_STATUS);
        assert!(report.notified);
        assert!(api.claims().is_empty());

        let stored = store.read().await.unwrap().expect("status guardado");
        assert_eq!(stored.status_text, NOT_LOGGED_IN_STATUS);
        assert!(is_clock(&stored.last_check_time));

        let hooks = api.webhooks();
        assert_eq!(hooks.len(), 1);
        assert_eq!(hooks[0]["message"], NOT_LOGGED_IN_STATUS);
    }

    #[test]
    async fn test_request_shape_and_legacy_cookies() {
        let api = Arc::new(FakeApi::default());
        let base = start_fake_api(api.clone());

        let service = checkin_service(
            fake_services(&base),
            "ltuid=42; ltoken=legacy_tok",
            memory_store().await,
            None,
        );
        service.perform_check_in().await.expect("run");

        let claims = api.claims();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].game, "genshin");
        assert_eq!(claims[1].game, "starrail");
        assert_eq!(claims[0].body["act_id"], "e202102251931481");
        assert_eq!(claims[1].body["act_id"], "e202303301540311");
        for c in &claims {
            assert_eq!(
                c.cookie.as_deref(),
                Some("ltoken_v2=legacy_tok; ltuid_v2=42;")
            );
            assert_eq!(c.referer.as_deref(), Some("https://act.hoyolab.com/"));
            assert_eq!(c.origin.as_deref(), Some("https://act.hoyolab.com"));
            assert_eq!(c.user_agent.as_deref(), Some(TEST_USER_AGENT));
            assert_eq!(c.content_type.as_deref(), Some("application/json"));
        }
    }

    #[test]
    async fn test_each_run_overwrites_status() {
        let api = Arc::new(FakeApi::default());
        let base = start_fake_api(api.clone());
        api.respond_retcode("genshin", 0);
        api.respond_retcode("starrail", 0);

        let store = memory_store().await;
        let service = checkin_service(fake_services(&base), V2_COOKIES, store.clone(), None);
        service.perform_check_in().await.expect("primera corrida");

        api.respond_retcode("genshin", -5003);
        api.respond_retcode("starrail", -5003);
        let second = service.perform_check_in().await.expect("segunda corrida");

        let stored = store.read().await.unwrap().expect("status guardado");
        assert_eq!(stored, second.status);
        assert_eq!(stored.status_text, "Genshin Impact: ✅ | Honkai: Star Rail: ✅");
    }
}
