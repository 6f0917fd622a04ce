/*!
 * Signal System Tests
 * Signal table, real OS delivery and process channel installation
 */

mod common;

use common::RecordingHost;
use nix::sys::signal::{raise, sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal as NixSignal};
use pretty_assertions::assert_eq;
use serial_test::serial;
use shell_events::core::SignalNumber;
use shell_events::events::SignalChannel;
use shell_events::signals::*;
use shell_events::{
    Event, EventConfig, EventDispatch, EventError, EventSystem, HandlerRegistry,
    SignalDescriber, SignalDisposition,
};
use std::sync::Arc;

/// The process-wide channel, installed on first use
fn process_channel() -> Arc<SignalChannel> {
    if let Some(channel) = process_signal_channel() {
        return channel;
    }
    let channel = Arc::new(SignalChannel::new());
    install_signal_channel(channel.clone()).unwrap();
    channel
}

/// Handler currently installed for `signal`
fn installed_handler(signal: NixSignal) -> SigHandler {
    let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
    // SAFETY: the previous action is put back straight away
    let previous = unsafe { sigaction(signal, &default) }.unwrap();
    unsafe { sigaction(signal, &previous) }.unwrap();
    previous.handler()
}

#[test]
fn test_signal_from_number() {
    assert_eq!(Signal::from_number(1).unwrap(), Signal::SIGHUP);
    assert_eq!(Signal::from_number(9).unwrap(), Signal::SIGKILL);
    assert_eq!(Signal::from_number(15).unwrap(), Signal::SIGTERM);
    assert_eq!(Signal::from_number(99), Err(EventError::InvalidSignal(99)));
}

#[test]
fn test_table_names_and_descriptions() {
    assert_eq!(SignalTable.signal_name(2), "SIGINT");
    assert_eq!(SignalTable.signal_description(2), "Interrupt");
    assert_eq!(SignalTable.signal_name(40), "SIG40");
    assert_eq!(SignalTable.signal_description(40), "Unknown signal");
}

#[test]
fn test_table_agrees_with_platform_numbers() {
    for signal in [NixSignal::SIGINT, NixSignal::SIGUSR1, NixSignal::SIGCHLD, NixSignal::SIGWINCH] {
        assert_eq!(SignalTable.signal_name(signal as SignalNumber), signal.as_str());
    }
}

#[test]
fn test_uncatchable_signal_is_rejected() {
    let result = OsSignalDisposition.set_catching(NixSignal::SIGKILL as SignalNumber, true);
    assert!(matches!(
        result,
        Err(EventError::DispositionFailed { signal: 9, .. })
    ));

    assert!(matches!(
        OsSignalDisposition.set_catching(NixSignal::SIGSTOP as SignalNumber, true),
        Err(EventError::DispositionFailed { signal: 19, .. })
    ));

    assert_eq!(
        OsSignalDisposition.set_catching(1000, true),
        Err(EventError::InvalidSignal(1000))
    );
}

#[test]
#[serial]
fn test_channel_installs_once() {
    let channel = process_channel();
    assert!(install_signal_channel(channel.clone()).is_ok());
    assert_eq!(
        install_signal_channel(Arc::new(SignalChannel::new())),
        Err(EventError::ChannelAlreadyInstalled)
    );
    assert!(Arc::ptr_eq(&process_signal_channel().unwrap(), &channel));
}

#[test]
#[serial]
fn test_raised_signal_reaches_handler() {
    let channel = process_channel();
    let events = EventSystem::with_channel(
        RecordingHost::with_os_dispositions(),
        EventConfig::default(),
        channel,
    );
    let usr1 = NixSignal::SIGUSR1 as SignalNumber;
    events.add_handler(&Event::signal(usr1).with_handler("on_usr1"));

    raise(NixSignal::SIGUSR1).unwrap();
    assert!(events.host().commands().is_empty());

    events.drain();
    assert_eq!(events.host().commands(), vec!["on_usr1 SIGUSR1".to_string()]);

    assert_eq!(events.remove(&Event::signal(usr1)), 1);
    assert_eq!(events.host().dispositions(), vec![(usr1, true), (usr1, false)]);
    events.shutdown();
}

#[test]
#[serial]
fn test_pause_defers_delivery() {
    let channel = process_channel();
    let events = EventSystem::with_channel(
        RecordingHost::with_os_dispositions(),
        EventConfig::bare_signals(),
        channel.clone(),
    );
    let usr2 = NixSignal::SIGUSR2 as SignalNumber;
    events.add_handler(&Event::signal(usr2).with_handler("on_usr2"));

    let pause = DeliveryPause::new();
    assert!(pause.is_active());
    raise(NixSignal::SIGUSR2).unwrap();
    assert!(!channel.queue().has_pending());

    drop(pause);
    assert!(channel.queue().has_pending());

    events.drain();
    assert_eq!(events.host().commands(), vec!["on_usr2".to_string()]);

    events.remove(&Event::signal(usr2));
    events.shutdown();
}

#[test]
#[serial]
fn test_unobserved_signal_is_not_recorded() {
    let channel = process_channel();
    assert!(!channel.interest().is_observed(NixSignal::SIGUSR1 as SignalNumber));
    assert!(!channel.record_if_observed(NixSignal::SIGUSR1 as SignalNumber));
    assert!(!channel.queue().has_pending());
}

#[test]
#[serial]
fn test_shutdown_restores_default_disposition() {
    let channel = process_channel();
    let events = EventSystem::with_channel(
        RecordingHost::with_os_dispositions(),
        EventConfig::default(),
        channel.clone(),
    );
    let usr2 = NixSignal::SIGUSR2 as SignalNumber;
    events.add_handler(&Event::signal(usr2).with_handler("on_usr2"));
    events.add_handler(&Event::signal(usr2).with_handler("also_usr2"));
    assert!(matches!(
        installed_handler(NixSignal::SIGUSR2),
        SigHandler::Handler(_)
    ));

    assert_eq!(events.shutdown(), 2);
    assert_eq!(installed_handler(NixSignal::SIGUSR2), SigHandler::SigDfl);
    assert!(!channel.interest().is_observed(usr2));
}
