mod common;

use common::FakeNova;
use novafleet_compute::{
    ComputeError, ComputeProvider, FleetManager, ManagerSettings, ServiceStatus,
};

async fn manager(fake: FakeNova) -> FleetManager<FakeNova> {
    FleetManager::with_provider(fake, ManagerSettings::default())
        .await
        .unwrap()
}

/// Two zones, one host in az1, one in the default zone, plus a control node
fn fleet() -> FakeNova {
    FakeNova::new()
        .with_zone(1, "az1-agg", Some("az1"), &["compute-01"])
        .with_zone(2, "az2-agg", Some("az2"), &[])
        .with_zone(3, "ssd", None, &[])
        .with_compute("compute-01", true)
        .with_compute("compute-02", false)
        .with_host("controller", "conductor")
}

#[tokio::test]
async fn test_list_hosts() {
    let fleet = manager(fleet()).await;

    assert_eq!(fleet.list_hosts(None).len(), 3);
    let compute: Vec<_> = fleet
        .list_hosts(Some("compute"))
        .iter()
        .map(|h| h.host_name.clone())
        .collect();
    assert_eq!(compute, vec!["compute-01", "compute-02"]);
    assert!(fleet.list_hosts(Some("scheduler")).is_empty());
}

#[tokio::test]
async fn test_list_hosts_with_owned_role() {
    let fleet = manager(fleet()).await;

    let hosts = {
        let role = fleet.settings().compute_service.clone();
        fleet.list_hosts(Some(&role))
    };
    assert_eq!(hosts.len(), 2);
    assert!(hosts.iter().all(|h| h.service == "compute"));
}

#[tokio::test]
async fn test_host_exists() {
    let fleet = manager(fleet()).await;

    assert!(fleet.host_exists("compute-01", None));
    assert!(!fleet.host_exists("COMPUTE-01", None));
    assert!(!fleet.host_exists("controller", None));
    assert!(fleet.host_exists("controller", Some("conductor")));
}

#[tokio::test]
async fn test_zone_exists_is_stable() {
    let fleet = manager(fleet()).await;

    let first = fleet.zone_exists("az1").unwrap();
    let second = fleet.zone_exists("az1").unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(first.name, "az1-agg");
    assert!(fleet.zone_exists("az9").is_none());
}

#[tokio::test]
async fn test_host_zones_and_membership() {
    let fleet = manager(fleet()).await;

    assert_eq!(fleet.host_zones("compute-01"), vec!["az1"]);
    assert_eq!(fleet.host_zones("compute-02"), vec!["nova"]);
    assert!(fleet.host_zones("ghost").is_empty());

    assert!(fleet.host_in_zone("compute-01", "az1", None));
    assert!(!fleet.host_in_zone("compute-01", "az2", None));
    assert!(!fleet.host_in_zone("ghost", "az1", None));
    assert!(!fleet.host_in_zone("compute-01", "az9", None));
}

#[tokio::test]
async fn test_service_status() {
    let fleet = manager(fleet()).await;

    assert_eq!(
        fleet.service_status("compute-01", None).await.unwrap(),
        ServiceStatus::Enabled
    );
    assert_eq!(
        fleet.service_status("compute-02", None).await.unwrap(),
        ServiceStatus::Disabled
    );
    assert_eq!(
        fleet
            .service_status("compute-01", Some("nova-network"))
            .await
            .unwrap(),
        ServiceStatus::Unknown
    );
}

#[tokio::test]
async fn test_set_service_enabled_round_trip() {
    let fleet = manager(fleet()).await;

    assert!(fleet.set_service_enabled("compute-01", None, false).await.unwrap());
    assert_eq!(
        fleet.service_status("compute-01", None).await.unwrap(),
        ServiceStatus::Disabled
    );

    assert!(fleet.set_service_enabled("compute-01", None, true).await.unwrap());
    assert_eq!(
        fleet.service_status("compute-01", None).await.unwrap(),
        ServiceStatus::Enabled
    );
}

#[tokio::test]
async fn test_set_service_enabled_soft_failures() {
    let fleet = manager(fleet().with_stuck_services()).await;

    // Unknown record: no provider call at all
    assert!(!fleet.set_service_enabled("ghost", None, true).await.unwrap());
    assert!(fleet.provider().calls().is_empty());

    // Provider accepts the call but the status does not change
    assert!(!fleet.set_service_enabled("compute-02", None, true).await.unwrap());
    assert_eq!(fleet.provider().status_of("compute-02"), Some(ServiceStatus::Disabled));
}

#[tokio::test]
async fn test_add_host_from_default_zone() {
    let fake = FakeNova::new()
        .with_zone(1, "az1-agg", Some("az1"), &[])
        .with_compute("h1", true);
    let mut fleet = manager(fake).await;

    assert!(fleet.add_host_to_zone("h1", "az1").await.unwrap());
    assert_eq!(fleet.host_zones("h1"), vec!["az1"]);
    assert!(fleet.host_in_zone("h1", "az1", None));

    // Host was only in the default zone, so nothing was removed
    let calls = fleet.provider().calls();
    assert!(calls.iter().all(|c| !c.starts_with("remove:")));
    assert!(calls.contains(&"add:1:h1".to_string()));
}

#[tokio::test]
async fn test_add_host_moves_between_zones() {
    let mut fleet = manager(fleet()).await;
    let version = fleet.snapshot().version;

    assert!(fleet.add_host_to_zone("compute-01", "az2").await.unwrap());
    assert_eq!(fleet.host_zones("compute-01"), vec!["az2"]);
    assert!(fleet.snapshot().version > version);

    let calls = fleet.provider().calls();
    let remove = calls.iter().position(|c| c == "remove:1:compute-01").unwrap();
    let add = calls.iter().position(|c| c == "add:2:compute-01").unwrap();
    assert!(remove < add);
}

#[tokio::test]
async fn test_add_host_reenables_service() {
    let mut fleet = manager(fleet()).await;

    assert!(fleet.add_host_to_zone("compute-02", "az1").await.unwrap());
    assert_eq!(
        fleet.provider().status_of("compute-02"),
        Some(ServiceStatus::Enabled)
    );
}

#[tokio::test]
async fn test_add_host_preconditions() {
    let mut fleet = manager(fleet()).await;

    let err = fleet.add_host_to_zone("ghost", "az1").await.unwrap_err();
    assert!(matches!(err, ComputeError::NoSuchHost { ref host, .. } if host == "ghost"));

    let err = fleet.add_host_to_zone("compute-02", "az9").await.unwrap_err();
    assert!(matches!(err, ComputeError::NoSuchZone(ref zone) if zone == "az9"));

    let err = fleet.add_host_to_zone("compute-01", "az1").await.unwrap_err();
    assert!(matches!(err, ComputeError::HostAlreadyAssigned { .. }));

    assert!(fleet.provider().calls().is_empty());
}

#[tokio::test]
async fn test_add_host_verification_sees_provider_state() {
    let mut fleet = manager(fleet().ignoring_aggregate_adds()).await;

    assert!(!fleet.add_host_to_zone("compute-02", "az2").await.unwrap());
    assert_eq!(fleet.host_zones("compute-02"), vec!["nova"]);
}

#[tokio::test]
async fn test_remove_host_from_zone() {
    let mut fleet = manager(fleet()).await;

    assert!(fleet.remove_host_from_zone("compute-01", "az1").await.unwrap());
    assert_eq!(fleet.host_zones("compute-01"), vec!["nova"]);
    assert!(!fleet.host_in_zone("compute-01", "az1", None));
}

#[tokio::test]
async fn test_remove_host_not_in_zone_does_not_mutate() {
    let mut fleet = manager(fleet()).await;
    let version = fleet.snapshot().version;

    let err = fleet
        .remove_host_from_zone("compute-02", "az1")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ComputeError::HostNotInZone { ref host, ref zone } if host == "compute-02" && zone == "az1"
    ));
    assert!(fleet.provider().calls().is_empty());
    assert_eq!(fleet.snapshot().version, version);
}

#[tokio::test]
async fn test_remove_host_preconditions() {
    let mut fleet = manager(fleet()).await;

    let err = fleet.remove_host_from_zone("compute-01", "az9").await.unwrap_err();
    assert!(matches!(err, ComputeError::NoSuchZone(_)));

    let err = fleet.remove_host_from_zone("ghost", "az1").await.unwrap_err();
    assert!(matches!(err, ComputeError::NoSuchHost { .. }));
    assert!(err.is_domain_error());
}

#[tokio::test]
async fn test_add_compute_to_aggregate() {
    let mut fleet = manager(fleet()).await;

    let added = fleet
        .add_compute_to_aggregate("compute-03", "ssd")
        .await
        .unwrap();
    assert_eq!(added, "compute-03.local");

    let added = fleet
        .add_compute_to_aggregate("compute-04.local", "ssd")
        .await
        .unwrap();
    assert_eq!(added, "compute-04.local");

    let ssd = fleet.snapshot().aggregate_named("ssd").unwrap();
    assert_eq!(ssd.hosts, vec!["compute-03.local", "compute-04.local"]);
}

#[tokio::test]
async fn test_add_compute_to_unknown_aggregate() {
    let mut fleet = manager(fleet()).await;

    let err = fleet
        .add_compute_to_aggregate("compute-03", "missing")
        .await
        .unwrap_err();
    assert!(matches!(err, ComputeError::NoSuchAggregate(_)));
    assert!(fleet.provider().calls().is_empty());
}

#[tokio::test]
async fn test_snapshot_is_not_refreshed_implicitly() {
    let fake = fleet();
    let mut fleet = manager(fake).await;

    // Out-of-band change made directly against the provider
    fleet
        .provider()
        .add_host_to_aggregate(2, "compute-02")
        .await
        .unwrap();

    assert_eq!(fleet.host_zones("compute-02"), vec!["nova"]);
    assert_eq!(fleet.refresh().await.unwrap(), 2);
    assert_eq!(fleet.host_zones("compute-02"), vec!["az2"]);
}
