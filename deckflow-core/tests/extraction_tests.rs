// File: deckflow-core/tests/extraction_tests.rs

mod test_utils;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use deckflow_common::models::{
    ExtractionConfig, ExtractionResult, ExtractionStatus, ImageLayout, ProductContent,
};
use deckflow_common::traits::{ExtractionService, LivenessProbe};
use deckflow_core::extraction::ContentExtractionClient;
use deckflow_core::Error;
use mockall::mock;

use test_utils::helpers::{names, EchoExtraction, SlowProbe, StaticProbe};

mock! {
    Extraction {}
    #[async_trait]
    impl ExtractionService for Extraction {
        async fn extract(
            &self,
            product_names: &[String],
            config: &ExtractionConfig,
        ) -> Result<ExtractionResult, Error>;
    }
}

mock! {
    Probe {}
    #[async_trait]
    impl LivenessProbe for Probe {
        async fn check(&self) -> Result<bool, Error>;
    }
}

fn untouched_service() -> Arc<MockExtraction> {
    let mut service = MockExtraction::new();
    service.expect_extract().never();
    Arc::new(service)
}

#[tokio::test]
async fn unavailable_service_yields_simulated_content() -> Result<(), Error> {
    let client = ContentExtractionClient::new(untouched_service(), Arc::new(StaticProbe(false)));

    let result = client
        .extract(&names(&["AI Photobooth", "Kinetic Ceiling", "Kinetic Blooming Flower"]))
        .await?;

    assert_eq!(result.status(), ExtractionStatus::Simulated);
    let layouts: Vec<_> = result.products().iter().map(|p| p.image_layout).collect();
    assert_eq!(
        layouts,
        vec![ImageLayout::Single, ImageLayout::SideBySide, ImageLayout::Grid]
    );
    Ok(())
}

#[tokio::test]
async fn probe_errors_and_timeouts_count_as_unavailable() -> Result<(), Error> {
    let mut failing = MockProbe::new();
    failing
        .expect_check()
        .times(1)
        .returning(|| Err(Error::Unavailable("connection refused".into())));
    let client = ContentExtractionClient::new(untouched_service(), Arc::new(failing));
    assert!(client.extract(&names(&["Kiosk"])).await?.is_simulated());

    let slow = ContentExtractionClient::new(
        untouched_service(),
        Arc::new(SlowProbe(Duration::from_secs(5))),
    )
    .with_probe_timeout(Duration::from_millis(20));
    assert!(slow.extract(&names(&["Kiosk"])).await?.is_simulated());
    Ok(())
}

#[tokio::test]
async fn live_content_is_returned_when_service_is_up() -> Result<(), Error> {
    let service = Arc::new(EchoExtraction::default());
    let client = ContentExtractionClient::new(service.clone(), Arc::new(StaticProbe(true)));

    let result = client.extract(&names(&["Holo Fan", "Smart Mirror"])).await?;

    assert_eq!(result.status(), ExtractionStatus::Success);
    assert_eq!(result.product(1).unwrap().product_name(), "Smart Mirror");
    assert_eq!(result.product(0).unwrap().overview, "Live overview of Holo Fan");
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn configuration_is_passed_to_the_service() -> Result<(), Error> {
    let mut service = MockExtraction::new();
    service
        .expect_extract()
        .withf(|product_names, config| {
            product_names.len() == 1
                && config.overview_lines == 3
                && config.points_per_section == 2
        })
        .times(1)
        .returning(|product_names, _| {
            Ok(ExtractionResult::new(
                vec![ProductContent::new(product_names[0].clone(), ImageLayout::Single)],
                ExtractionStatus::Success,
            ))
        });
    let config = ExtractionConfig {
        overview_lines: 3,
        ..ExtractionConfig::default()
    };
    let client = ContentExtractionClient::new(Arc::new(service), Arc::new(StaticProbe(true)))
        .with_config(config);

    let result = client.extract(&names(&["Kiosk"])).await?;
    assert_eq!(result.count(), 1);
    Ok(())
}

#[tokio::test]
async fn transport_failure_of_live_call_falls_back() -> Result<(), Error> {
    let mut service = MockExtraction::new();
    service
        .expect_extract()
        .times(1)
        .returning(|_, _| Err(Error::Unavailable("connection reset".into())));
    let client = ContentExtractionClient::new(Arc::new(service), Arc::new(StaticProbe(true)));

    let result = client.extract(&names(&["Kiosk", "Holo Fan"])).await?;
    assert!(result.is_simulated());
    assert_eq!(result.count(), 2);
    Ok(())
}

#[tokio::test]
async fn service_errors_propagate() {
    let mut service = MockExtraction::new();
    service.expect_extract().times(1).returning(|_, _| {
        Err(Error::Service {
            status: 500,
            message: "Failed to extract content: scraper crashed".into(),
        })
    });
    let client = ContentExtractionClient::new(Arc::new(service), Arc::new(StaticProbe(true)));

    let err = client.extract(&names(&["Kiosk"])).await.unwrap_err();
    assert!(matches!(err, Error::Service { status: 500, .. }));
}

#[tokio::test]
async fn short_live_results_are_rejected() {
    let mut service = MockExtraction::new();
    service.expect_extract().times(1).returning(|_, _| {
        Ok(ExtractionResult::new(
            vec![ProductContent::new("Kiosk", ImageLayout::Single)],
            ExtractionStatus::Success,
        ))
    });
    let client = ContentExtractionClient::new(Arc::new(service), Arc::new(StaticProbe(true)));

    let err = client
        .extract(&names(&["Kiosk", "Holo Fan"]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Service { .. }));
}

#[test]
fn fallback_runs_on_a_plain_blocking_call() {
    let client = ContentExtractionClient::new(untouched_service(), Arc::new(StaticProbe(false)));
    let result = tokio_test::block_on(client.extract(&names(&["Kiosk", "Holo Fan"]))).unwrap();
    assert_eq!(result.count(), 2);
    assert!(result.is_simulated());
}
