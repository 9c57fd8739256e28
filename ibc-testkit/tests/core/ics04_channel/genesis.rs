use ibc_eureka_core::channel::genesis::{export_genesis, import_genesis};
use ibc_eureka_core::channel::types::error::ChannelError;
use ibc_eureka_core::channel::types::packet::PacketState;
use ibc_eureka_core::host::types::identifiers::Sequence;
use ibc_testkit::context::MockContext;
use ibc_testkit::fixtures::context::dummy_relayer_context;
use ibc_testkit::fixtures::packet::{dummy_transfer_payload, timeout_after};
use ibc_testkit::relayer::context::RelayerContext;
use ibc_testkit::testapp::applications::transfer::RecvMode;
use rstest::*;
use test_log::test;

/// Two packets relayed to B, the first acknowledged on A and the second
/// waiting for an asynchronous acknowledgement.
#[fixture]
fn relayer() -> RelayerContext {
    let mut relayer = dummy_relayer_context(1_000);
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 600);

    relayer
        .relay_packet(dummy_transfer_payload(10), timeout)
        .expect("relay succeeds");

    relayer
        .get_ctx_b_mut()
        .ibc_router
        .transfer_mut()
        .app_mut()
        .recv_mode = RecvMode::Async;
    let packet = relayer
        .send_packet_on_a(dummy_transfer_payload(20), timeout)
        .expect("send succeeds");
    relayer.recv_packet_on_b(packet).expect("recv succeeds");

    relayer
}

#[rstest]
#[test]
fn export_collects_the_packet_state(relayer: RelayerContext) {
    let client_on_a = relayer.client_id_on_a().clone();
    let genesis_a = export_genesis(relayer.get_ctx_a().ibc_store(), &[client_on_a]).unwrap();

    assert_eq!(genesis_a.commitments.len(), 1);
    assert_eq!(genesis_a.commitments[0].sequence, Sequence::from(2));
    assert!(genesis_a.receipts.is_empty());
    assert_eq!(genesis_a.send_sequences.len(), 1);
    assert_eq!(genesis_a.send_sequences[0].sequence, Sequence::from(3));

    let client_on_b = relayer.client_id_on_b().clone();
    let genesis_b = export_genesis(relayer.get_ctx_b().ibc_store(), &[client_on_b]).unwrap();

    assert_eq!(genesis_b.receipts.len(), 2);
    assert_eq!(genesis_b.acknowledgements.len(), 1);
    assert_eq!(genesis_b.async_packets.len(), 1);
    assert_eq!(genesis_b.async_packets[0].sequence, Sequence::from(2));
    assert!(genesis_b.commitments.is_empty());
}

#[rstest]
#[test]
fn import_restores_the_exported_state(relayer: RelayerContext) {
    for (ctx, client_id) in [
        (relayer.get_ctx_a(), relayer.client_id_on_a()),
        (relayer.get_ctx_b(), relayer.client_id_on_b()),
    ] {
        let client_ids = [client_id.clone()];
        let genesis = export_genesis(ctx.ibc_store(), &client_ids).unwrap();
        assert!(!genesis.is_empty());

        let mut fresh = MockContext::default();
        import_genesis(fresh.ibc_store_mut(), genesis.clone()).unwrap();

        assert_eq!(
            export_genesis(fresh.ibc_store(), &client_ids).unwrap(),
            genesis
        );
    }
}

#[test]
fn export_of_unknown_client_is_empty() {
    let relayer = dummy_relayer_context(0);
    let unknown = "07-tendermint-9".parse().unwrap();

    let genesis = export_genesis(relayer.get_ctx_a().ibc_store(), &[unknown]).unwrap();

    assert!(genesis.is_empty());
}

#[rstest]
#[test]
fn import_rejects_a_malformed_receipt(relayer: RelayerContext) {
    let client_ids = [relayer.client_id_on_b().clone()];
    let mut genesis = export_genesis(relayer.get_ctx_b().ibc_store(), &client_ids).unwrap();
    genesis.receipts.push(PacketState {
        client_id: client_ids[0].clone(),
        sequence: Sequence::from(7),
        data: vec![0x01],
    });

    let mut fresh = MockContext::default();
    let err = import_genesis(fresh.ibc_store_mut(), genesis).unwrap_err();

    assert!(matches!(err, ChannelError::InvalidPacket { .. }));
}
