//! End-to-end scenarios across an authority and its observers.

use netstate::core::Role;
use netstate::{
    state_id, AuthorityPolicy, MachineConfig, NetworkEvent, NetworkHooks, NullReplicator, Outbox,
    ReplicatedChange, Snapshot, StateBehaviour, StateError, StateMachine, StateMachineBuilder,
};
use std::cell::RefCell;
use std::rc::Rc;

state_id! {
    enum Phase {
        Idle,
        Running,
    }
}

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
    name: &'static str,
    log: Log,
}

impl Recorder {
    fn push(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{}.{}", self.name, hook));
    }
}

impl StateBehaviour for Recorder {
    fn enter_network(&mut self) {
        self.push("enter_network");
    }
    fn exit_network(&mut self) {
        self.push("exit_network");
    }
    fn enter_authority(&mut self) {
        self.push("enter(authority)");
    }
    fn exit_authority(&mut self) {
        self.push("exit(authority)");
    }
    fn enter_observer(&mut self) {
        self.push("enter(observer)");
    }
    fn exit_observer(&mut self) {
        self.push("exit(observer)");
    }
}

fn build<R: netstate::Replicator<Phase>>(
    log: &Log,
    replicator: R,
) -> StateMachine<Phase, Box<dyn StateBehaviour>, R> {
    StateMachineBuilder::new()
        .state(
            Phase::Idle,
            Box::new(Recorder {
                name: "Idle",
                log: Rc::clone(log),
            }) as Box<dyn StateBehaviour>,
        )
        .state(
            Phase::Running,
            Box::new(Recorder {
                name: "Running",
                log: Rc::clone(log),
            }) as Box<dyn StateBehaviour>,
        )
        .replicator(replicator)
        .build()
        .unwrap()
}

fn take(log: &Log) -> Vec<String> {
    log.borrow_mut().drain(..).collect()
}

#[test]
fn authority_enters_running_then_idle() {
    let log = Log::default();
    let mut server = build(&log, Outbox::new());
    server.on_authority_started();

    server.enter(Phase::Running).unwrap();
    assert_eq!(
        take(&log),
        vec!["Running.enter_network", "Running.enter(authority)"]
    );

    server.enter(Phase::Idle).unwrap();
    assert_eq!(
        take(&log),
        vec![
            "Running.exit(authority)",
            "Running.exit_network",
            "Idle.enter_network",
            "Idle.enter(authority)",
        ]
    );
}

#[test]
fn observer_receives_first_change() {
    let log = Log::default();
    let mut client = build(&log, NullReplicator);
    client.on_observer_started().unwrap();

    client
        .on_replicated(&ReplicatedChange::new(None, Some(Phase::Running)), false)
        .unwrap();

    assert_eq!(
        take(&log),
        vec!["Running.enter_network", "Running.enter(observer)"]
    );
}

#[test]
fn authority_stopped_exits_once_and_keeps_pointer() {
    let log = Log::default();
    let mut server = build(&log, NullReplicator);
    server.on_authority_started();
    server.enter(Phase::Running).unwrap();
    take(&log);

    server.on_authority_stopped();
    server.on_authority_stopped();

    assert_eq!(
        take(&log),
        vec!["Running.exit(authority)", "Running.exit_network"]
    );
    assert_eq!(server.current(), Some(&Phase::Running));
    assert!(!server
        .state(&Phase::Running)
        .unwrap()
        .is_entered(Role::Authority));
}

#[test]
fn server_and_two_clients_stay_in_step() {
    let server_log = Log::default();
    let client_log = Log::default();
    let mut server = build(&server_log, Outbox::new());
    let mut clients = vec![
        build(&client_log, NullReplicator),
        build(&client_log, NullReplicator),
    ];

    server.on_authority_started();
    for client in &mut clients {
        client.on_observer_started().unwrap();
    }

    server.enter(Phase::Idle).unwrap();
    server.enter(Phase::Running).unwrap();
    let changes = server.replicator_mut().drain();
    assert_eq!(changes.len(), 2);

    for client in &mut clients {
        for change in &changes {
            let json = change.to_json().unwrap();
            client
                .on_replicated(&ReplicatedChange::from_json(&json).unwrap(), false)
                .unwrap();
        }
        assert_eq!(client.current(), Some(&Phase::Running));
    }

    let observed = take(&client_log);
    assert_eq!(
        observed
            .iter()
            .filter(|c| c.as_str() == "Running.enter(observer)")
            .count(),
        2
    );
    assert_eq!(
        observed
            .iter()
            .filter(|c| c.as_str() == "Idle.exit(observer)")
            .count(),
        2
    );
}

#[test]
fn listen_server_fires_network_hooks_once() {
    let log = Log::default();
    let mut host = build(&log, Outbox::new());
    host.on_authority_started();
    host.on_observer_started().unwrap();

    host.enter(Phase::Running).unwrap();
    for change in host.replicator_mut().drain() {
        host.on_replicated(&change, true).unwrap();
        host.on_replicated(&change, false).unwrap();
    }

    assert_eq!(
        take(&log),
        vec![
            "Running.enter_network",
            "Running.enter(authority)",
            "Running.enter(observer)",
        ]
    );

    host.on_observer_stopped();
    host.on_authority_stopped();
    assert_eq!(
        take(&log),
        vec![
            "Running.exit(observer)",
            "Running.exit(authority)",
            "Running.exit_network",
        ]
    );
}

#[test]
fn reentering_current_is_invisible_to_observers() {
    let server_log = Log::default();
    let client_log = Log::default();
    let mut server = build(&server_log, Outbox::new());
    let mut client = build(&client_log, NullReplicator);
    server.on_authority_started();
    client.on_observer_started().unwrap();

    server.enter(Phase::Running).unwrap();
    server.enter(Phase::Running).unwrap();
    for change in server.replicator_mut().drain() {
        client.on_replicated(&change, false).unwrap();
    }

    assert_eq!(
        take(&server_log),
        vec![
            "Running.enter_network",
            "Running.enter(authority)",
            "Running.exit(authority)",
            "Running.exit_network",
            "Running.enter_network",
            "Running.enter(authority)",
        ]
    );
    assert_eq!(
        take(&client_log),
        vec!["Running.enter_network", "Running.enter(observer)"]
    );
    assert_eq!(server.history().len(), 1);
}

#[test]
fn host_observing_late_drains_outbox_cleanly() {
    let log = Log::default();
    let mut host = build(&log, Outbox::new());
    host.on_authority_started();
    host.enter(Phase::Running).unwrap();
    host.on_observer_started().unwrap();

    let changes = host.replicator_mut().drain();
    let results: Vec<_> = changes
        .iter()
        .map(|change| host.on_replicated(change, false))
        .collect();

    assert_eq!(results, vec![Ok(())]);
    assert_eq!(
        take(&log),
        vec![
            "Running.enter_network",
            "Running.enter(authority)",
            "Running.enter(observer)",
        ]
    );
}

#[test]
fn late_joiner_catches_up_from_snapshot() {
    let log = Log::default();
    let mut server = build(&log, NullReplicator);
    server.on_authority_started();
    server.enter(Phase::Idle).unwrap();
    server.enter(Phase::Running).unwrap();

    let bytes = Snapshot::capture(&server).to_bytes().unwrap();
    let snapshot = Snapshot::<Phase>::from_bytes(&bytes).unwrap();
    assert_eq!(snapshot.history.len(), 2);

    let client_log = Log::default();
    let mut client = build(&client_log, NullReplicator);
    client.on_observer_started().unwrap();
    client.on_replicated(&snapshot.join_change(), false).unwrap();

    assert_eq!(client.current(), Some(&Phase::Running));
    assert_eq!(
        take(&client_log),
        vec!["Running.enter_network", "Running.enter(observer)"]
    );
}

#[test]
fn lifecycle_hooks_drive_machine() {
    let log = Log::default();
    let machine = RefCell::new(build(&log, NullReplicator));
    let errors = RefCell::new(Vec::<StateError>::new());
    {
        let mut hooks = NetworkHooks::new();
        hooks.subscribe_all(|event| {
            if let Err(e) = machine.borrow_mut().handle(event) {
                errors.borrow_mut().push(e);
            }
        });
        hooks.emit(NetworkEvent::NetworkStarted);
        hooks.emit(NetworkEvent::AuthorityStarted);
        machine.borrow_mut().enter(Phase::Running).unwrap();
        hooks.emit(NetworkEvent::AuthorityStopped);
        hooks.emit(NetworkEvent::NetworkStopped);
    }

    assert!(errors.into_inner().is_empty());
    assert_eq!(
        take(&log),
        vec![
            "Running.enter_network",
            "Running.enter(authority)",
            "Running.exit(authority)",
            "Running.exit_network",
        ]
    );
}

#[test]
fn observer_side_enter_is_ignored_under_ignore_policy() {
    let log = Log::default();
    let mut client = StateMachineBuilder::new()
        .state(
            Phase::Idle,
            Box::new(Recorder {
                name: "Idle",
                log: Rc::clone(&log),
            }) as Box<dyn StateBehaviour>,
        )
        .config(MachineConfig::default().with_authority_policy(AuthorityPolicy::Ignore))
        .build()
        .unwrap();

    assert_eq!(client.enter(Phase::Idle), Ok(false));
    assert!(take(&log).is_empty());
    assert!(client.current().is_none());
}
