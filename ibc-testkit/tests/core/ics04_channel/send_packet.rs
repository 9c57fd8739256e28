use core::time::Duration;

use ibc_eureka_core::channel::types::commitment::compute_packet_commitment;
use ibc_eureka_core::channel::types::error::ChannelError;
use ibc_eureka_core::channel::types::msgs::{MsgSendPacket, PacketMsg};
use ibc_eureka_core::channel::types::timeout::TimeoutTimestamp;
use ibc_eureka_core::client::types::Status;
use ibc_eureka_core::handler::types::error::HandlerError;
use ibc_eureka_core::handler::types::events::IbcEvent;
use ibc_eureka_core::handler::types::msgs::{MsgEnvelope, MsgResponse};
use ibc_eureka_core::host::types::identifiers::Sequence;
use ibc_eureka_core::host::types::path::CommitmentPath;
use ibc_eureka_core::host::ValidationContext;
use ibc_eureka_core::primitives::Signer;
use ibc_testkit::fixtures::context::dummy_relayer_context;
use ibc_testkit::fixtures::packet::{
    dummy_client_id, dummy_signer, dummy_transfer_payload, timeout_after, SENDER,
};
use ibc_testkit::relayer::context::RelayerContext;
use ibc_testkit::relayer::error::RelayerError;
use ibc_testkit::testapp::applications::transfer::{balance_of, escrow_account, TRANSFER_EVENT};
use rstest::*;
use test_log::test;

#[fixture]
fn relayer() -> RelayerContext {
    dummy_relayer_context(1_000)
}

fn send_msg(relayer: &RelayerContext, timeout: TimeoutTimestamp, signer: Signer) -> MsgEnvelope {
    MsgEnvelope::from(PacketMsg::from(MsgSendPacket::new(
        relayer.client_id_on_a().clone(),
        timeout,
        vec![dummy_transfer_payload(100)],
        signer,
    )))
}

#[rstest]
#[test]
fn send_packet_assigns_consecutive_sequences(mut relayer: RelayerContext) {
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 600);

    let first = relayer
        .send_packet_on_a(dummy_transfer_payload(100), timeout)
        .expect("first send succeeds");
    let second = relayer
        .send_packet_on_a(dummy_transfer_payload(100), timeout)
        .expect("second send succeeds");

    assert_eq!(first.sequence, Sequence::from(1));
    assert_eq!(second.sequence, Sequence::from(2));
    assert_eq!(first.destination_client, *relayer.client_id_on_b());

    let ctx_a = relayer.get_ctx_a();
    for packet in [&first, &second] {
        let stored = ctx_a
            .ibc_store()
            .get_packet_commitment(&CommitmentPath::new(&packet.source_client, packet.sequence))
            .unwrap();
        assert_eq!(stored, Some(compute_packet_commitment(packet)));
    }

    let store = &ctx_a.ibc_store().app.store;
    assert_eq!(balance_of(store, SENDER).unwrap(), 800);
    assert_eq!(
        balance_of(store, &escrow_account(relayer.client_id_on_a())).unwrap(),
        200
    );
}

#[rstest]
#[test]
fn send_packet_emits_events(mut relayer: RelayerContext) {
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 600);
    let msg = send_msg(&relayer, timeout, dummy_signer());

    let response = relayer.get_ctx_a_mut().deliver(msg).unwrap();
    assert_eq!(
        response,
        MsgResponse::Send {
            sequence: Sequence::from(1)
        }
    );

    let ctx_a = relayer.get_ctx_a();
    assert!(ctx_a
        .get_events()
        .iter()
        .any(|event| matches!(event, IbcEvent::SendPacket(e) if e.packet().sequence == Sequence::from(1))));
    assert_eq!(ctx_a.module_events(TRANSFER_EVENT).len(), 1);
    assert!(ctx_a
        .get_logs()
        .iter()
        .any(|log| log.starts_with("success: packet send")));
}

#[rstest]
#[test]
fn send_packet_rejects_expired_timeout(mut relayer: RelayerContext) {
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 0);
    let msg = send_msg(&relayer, timeout, dummy_signer());

    let err = relayer.get_ctx_a_mut().deliver(msg).unwrap_err();
    assert!(matches!(
        err,
        RelayerError::TransactionFailed(HandlerError::Channel(ChannelError::TimeoutElapsed {
            timeout: t,
            ..
        })) if t == timeout
    ));
}

#[rstest]
#[test]
fn send_packet_rejects_timeout_beyond_max_delta(mut relayer: RelayerContext) {
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 2 * 24 * 60 * 60);
    let msg = send_msg(&relayer, timeout, dummy_signer());

    let err = relayer.get_ctx_a_mut().deliver(msg).unwrap_err();
    assert!(matches!(
        err,
        RelayerError::TransactionFailed(HandlerError::Channel(ChannelError::InvalidTimeout { .. }))
    ));
}

#[rstest]
#[test]
fn send_packet_rejects_timeout_elapsed_on_counterparty(mut relayer: RelayerContext) {
    relayer
        .get_ctx_b_mut()
        .advance_time(Duration::from_secs(60 * 60));
    relayer.update_client_on_a();

    let counterparty_time = relayer.get_ctx_b().latest_timestamp();
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 600);
    assert!(timeout.has_expired(&counterparty_time));

    let err = relayer
        .send_packet_on_a(dummy_transfer_payload(100), timeout)
        .unwrap_err();
    assert!(matches!(
        err,
        RelayerError::TransactionFailed(HandlerError::Channel(ChannelError::TimeoutElapsed {
            timeout: t,
            timestamp,
        })) if t == timeout && timestamp == counterparty_time
    ));

    let ctx_a = relayer.get_ctx_a();
    assert!(ctx_a
        .ibc_store()
        .get_packet_commitment(&CommitmentPath::new(relayer.client_id_on_a(), Sequence::from(1)))
        .unwrap()
        .is_none());
    assert_eq!(balance_of(&ctx_a.ibc_store().app.store, SENDER).unwrap(), 1_000);
}

#[rstest]
#[case::valid_timeout(600)]
#[case::expired_timeout(0)]
#[test_log::test]
fn send_packet_requires_counterparty(mut relayer: RelayerContext, #[case] offset_secs: u64) {
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), offset_secs);
    let unknown = dummy_client_id(9);
    let msg = MsgEnvelope::from(PacketMsg::from(MsgSendPacket::new(
        unknown.clone(),
        timeout,
        vec![dummy_transfer_payload(100)],
        dummy_signer(),
    )));

    let err = relayer.get_ctx_a_mut().deliver(msg).unwrap_err();
    assert!(matches!(
        err,
        RelayerError::TransactionFailed(HandlerError::Channel(ChannelError::CounterpartyNotFound(id)))
            if id == unknown
    ));
}

#[rstest]
#[test]
fn send_packet_requires_active_client(mut relayer: RelayerContext) {
    let client_id = relayer.client_id_on_a().clone();
    relayer
        .get_ctx_a_mut()
        .ibc_store_mut()
        .clients
        .set_status(&client_id, Status::Frozen)
        .unwrap();

    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 600);
    let err = relayer
        .send_packet_on_a(dummy_transfer_payload(100), timeout)
        .unwrap_err();

    assert!(matches!(
        err,
        RelayerError::TransactionFailed(HandlerError::Channel(ChannelError::ClientNotActive {
            status: Status::Frozen,
            ..
        }))
    ));
}

#[rstest]
#[test]
fn send_packet_rejects_blank_signer(mut relayer: RelayerContext) {
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 600);
    let msg = send_msg(&relayer, timeout, Signer::from(" "));

    let err = relayer.get_ctx_a_mut().deliver(msg).unwrap_err();
    assert!(matches!(
        err,
        RelayerError::TransactionFailed(HandlerError::Channel(ChannelError::Host(_)))
    ));
}

#[rstest]
#[test]
fn failed_application_send_leaves_no_state(mut relayer: RelayerContext) {
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 600);
    let height_before = relayer.get_ctx_a().latest_height();

    // the sender only holds 1000
    let err = relayer
        .send_packet_on_a(dummy_transfer_payload(5_000), timeout)
        .unwrap_err();
    assert!(matches!(
        err,
        RelayerError::TransactionFailed(HandlerError::Channel(ChannelError::Module(_)))
    ));

    let ctx_a = relayer.get_ctx_a();
    assert_eq!(ctx_a.latest_height(), height_before);
    assert!(ctx_a
        .ibc_store()
        .get_packet_commitment(&CommitmentPath::new(relayer.client_id_on_a(), Sequence::from(1)))
        .unwrap()
        .is_none());
    assert_eq!(balance_of(&ctx_a.ibc_store().app.store, SENDER).unwrap(), 1_000);

    // the failed send did not consume the sequence
    let packet = relayer
        .send_packet_on_a(dummy_transfer_payload(100), timeout)
        .unwrap();
    assert_eq!(packet.sequence, Sequence::from(1));
}
