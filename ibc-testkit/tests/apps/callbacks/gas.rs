use ibc_app_callbacks::types::events::{
    CALLBACK_COMMIT_GAS_LIMIT_ATTRIBUTE_KEY, CALLBACK_ERROR_ATTRIBUTE_KEY,
    CALLBACK_EXEC_GAS_LIMIT_ATTRIBUTE_KEY, CALLBACK_RESULT_ATTRIBUTE_KEY,
    CALLBACK_RESULT_FAILURE, CALLBACK_RESULT_SUCCESS, SOURCE_CALLBACK_EVENT,
};
use ibc_app_callbacks::types::CallbackType;
use ibc_eureka_core::channel::types::acknowledgement::Acknowledgement;
use ibc_eureka_core::channel::types::packet::Packet;
use ibc_eureka_core::handler::types::msgs::{MsgResponse, ResponseResultType};
use ibc_eureka_core::host::types::path::CommitmentPath;
use ibc_eureka_core::host::ValidationContext;
use ibc_eureka_core::router::types::error::AbortSignal;
use ibc_testkit::fixtures::context::{dummy_relayer_context, DEFAULT_TX_GAS_LIMIT};
use ibc_testkit::fixtures::packet::{callback_payload, timeout_after, CallbackMemo, CONTRACT};
use ibc_testkit::relayer::context::RelayerContext;
use ibc_testkit::testapp::applications::contract::ContractBehavior;
use ibc_testkit::testapp::router::DEFAULT_MAX_CALLBACK_GAS;
use rstest::*;
use test_log::test;

use super::{abort_signal, callback_event, contract_state_committed, keeper, script};

const USER_GAS_LIMIT: u64 = 5_000;

#[fixture]
fn relayer() -> RelayerContext {
    dummy_relayer_context(1_000)
}

/// Sends a packet asking for source callbacks limited to `gas_limit` and
/// relays it to B, returning it with B's acknowledgement.
fn received_packet(relayer: &mut RelayerContext, gas_limit: u64) -> (Packet, Acknowledgement) {
    let payload = callback_payload(
        100,
        Some(CallbackMemo::new(CONTRACT).with_gas_limit(gas_limit)),
        None,
    );
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 600);
    let packet = relayer
        .send_packet_on_a(payload, timeout)
        .expect("send succeeds");
    relayer
        .recv_packet_on_b(packet.clone())
        .expect("recv succeeds");
    let acknowledgement = relayer.acknowledgement_on_b(&packet).unwrap();
    (packet, acknowledgement)
}

fn has_commitment(relayer: &RelayerContext, packet: &Packet) -> bool {
    relayer
        .get_ctx_a()
        .ibc_store()
        .get_packet_commitment(&CommitmentPath::new(&packet.source_client, packet.sequence))
        .unwrap()
        .is_some()
}

#[rstest]
#[case::user_limit(Some(USER_GAS_LIMIT), USER_GAS_LIMIT)]
#[case::capped_by_max_callback_gas(Some(10 * DEFAULT_MAX_CALLBACK_GAS), DEFAULT_MAX_CALLBACK_GAS)]
#[case::unset_falls_back_to_max_callback_gas(None, DEFAULT_MAX_CALLBACK_GAS)]
#[test_log::test]
fn callback_gas_limits_follow_the_memo(
    mut relayer: RelayerContext,
    #[case] user_limit: Option<u64>,
    #[case] expected: u64,
) {
    let memo = match user_limit {
        Some(limit) => CallbackMemo::new(CONTRACT).with_gas_limit(limit),
        None => CallbackMemo::new(CONTRACT),
    };
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 600);
    relayer
        .send_packet_on_a(callback_payload(100, Some(memo), None), timeout)
        .expect("send succeeds");

    let ctx_a = relayer.get_ctx_a();
    assert_eq!(
        keeper(ctx_a).calls_of(CallbackType::SendPacket)[0].execution_gas_limit,
        expected
    );

    let event = callback_event(ctx_a, SOURCE_CALLBACK_EVENT, CallbackType::SendPacket)
        .expect("send callback event");
    let expected = expected.to_string();
    assert_eq!(
        event.attribute(CALLBACK_EXEC_GAS_LIMIT_ATTRIBUTE_KEY),
        Some(expected.as_str())
    );
    assert_eq!(
        event.attribute(CALLBACK_COMMIT_GAS_LIMIT_ATTRIBUTE_KEY),
        Some(expected.as_str())
    );
}

#[rstest]
#[test]
fn transaction_is_charged_the_gas_the_callback_used(mut relayer: RelayerContext) {
    script(
        relayer.get_ctx_a_mut(),
        CallbackType::AcknowledgementPacket,
        ContractBehavior::BurnGas(3_000),
    );
    let (packet, acknowledgement) = received_packet(&mut relayer, USER_GAS_LIMIT);

    relayer
        .ack_packet_on_a(packet.clone(), acknowledgement)
        .expect("ack succeeds");

    let ctx_a = relayer.get_ctx_a();
    assert_eq!(ctx_a.gas_consumed(), 3_000);
    assert!(contract_state_committed(
        ctx_a,
        CallbackType::AcknowledgementPacket,
        packet.sequence
    ));
}

#[rstest]
#[case::reported(ContractBehavior::BurnGas(USER_GAS_LIMIT + 1_000))]
#[case::silent(ContractBehavior::BurnGasSilently(USER_GAS_LIMIT + 1_000))]
#[test_log::test]
fn out_of_gas_at_the_commit_limit_is_reported(
    mut relayer: RelayerContext,
    #[case] behavior: ContractBehavior,
) {
    script(relayer.get_ctx_a_mut(), CallbackType::AcknowledgementPacket, behavior);
    let (packet, acknowledgement) = received_packet(&mut relayer, USER_GAS_LIMIT);

    let response = relayer
        .ack_packet_on_a(packet.clone(), acknowledgement)
        .expect("ack succeeds");

    assert_eq!(response, MsgResponse::Ack(ResponseResultType::Success));
    assert!(!has_commitment(&relayer, &packet));

    let ctx_a = relayer.get_ctx_a();
    // charged no more than the execution limit
    assert_eq!(ctx_a.gas_consumed(), USER_GAS_LIMIT);
    assert!(!contract_state_committed(
        ctx_a,
        CallbackType::AcknowledgementPacket,
        packet.sequence
    ));

    let event = callback_event(ctx_a, SOURCE_CALLBACK_EVENT, CallbackType::AcknowledgementPacket)
        .expect("acknowledgement callback event");
    assert_eq!(
        event.attribute(CALLBACK_RESULT_ATTRIBUTE_KEY),
        Some(CALLBACK_RESULT_FAILURE)
    );
    assert!(event
        .attribute(CALLBACK_ERROR_ATTRIBUTE_KEY)
        .is_some_and(|e| e.contains("ran out of gas")));
}

#[rstest]
#[test]
fn out_of_gas_below_the_commit_limit_aborts_for_retry(mut relayer: RelayerContext) {
    const RELAYER_GAS: u64 = 2_000;

    script(
        relayer.get_ctx_a_mut(),
        CallbackType::AcknowledgementPacket,
        ContractBehavior::BurnGas(3_000),
    );
    let (packet, acknowledgement) = received_packet(&mut relayer, USER_GAS_LIMIT);

    relayer.get_ctx_a_mut().tx_gas_limit = RELAYER_GAS;
    let err = relayer
        .ack_packet_on_a(packet.clone(), acknowledgement.clone())
        .unwrap_err();

    assert_eq!(
        abort_signal(&err),
        Some(&AbortSignal::OutOfGas {
            required_gas: USER_GAS_LIMIT
        })
    );
    assert!(has_commitment(&relayer, &packet));

    let calls = keeper(relayer.get_ctx_a()).calls_of(CallbackType::AcknowledgementPacket);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].execution_gas_limit, RELAYER_GAS);

    // relaying again with enough gas lets the callback through
    relayer.get_ctx_a_mut().tx_gas_limit = DEFAULT_TX_GAS_LIMIT;
    let response = relayer
        .ack_packet_on_a(packet.clone(), acknowledgement)
        .expect("ack succeeds");

    assert_eq!(response, MsgResponse::Ack(ResponseResultType::Success));
    assert!(!has_commitment(&relayer, &packet));

    let ctx_a = relayer.get_ctx_a();
    assert!(contract_state_committed(
        ctx_a,
        CallbackType::AcknowledgementPacket,
        packet.sequence
    ));
    let event = callback_event(ctx_a, SOURCE_CALLBACK_EVENT, CallbackType::AcknowledgementPacket)
        .expect("acknowledgement callback event");
    assert_eq!(
        event.attribute(CALLBACK_RESULT_ATTRIBUTE_KEY),
        Some(CALLBACK_RESULT_SUCCESS)
    );
}

#[rstest]
#[test]
fn out_of_gas_send_callback_aborts_for_retry(mut relayer: RelayerContext) {
    script(
        relayer.get_ctx_a_mut(),
        CallbackType::SendPacket,
        ContractBehavior::BurnGas(3_000),
    );
    relayer.get_ctx_a_mut().tx_gas_limit = 2_000;

    let payload = callback_payload(
        100,
        Some(CallbackMemo::new(CONTRACT).with_gas_limit(USER_GAS_LIMIT)),
        None,
    );
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 600);
    let err = relayer.send_packet_on_a(payload, timeout).unwrap_err();

    assert_eq!(
        abort_signal(&err),
        Some(&AbortSignal::OutOfGas {
            required_gas: USER_GAS_LIMIT
        })
    );
}
