//! Session registry tests: lifecycle, error taxonomy, concurrency

use load_balancer_sim_core_rs::{
    CreateRequest, SessionId, SessionRegistry, Simulation, SimulationConfig, SimulationError,
    StrategyKind, Task, WorkloadDistribution, MAX_TASKS, MAX_WORKERS, MAX_WORKLOAD,
};
use std::sync::Arc;
use std::thread;

fn request(num_workers: i64, num_tasks: i64, strategy: &str) -> CreateRequest {
    CreateRequest {
        num_workers,
        num_tasks,
        strategy: strategy.to_string(),
        seed: Some(2024),
        workload: None,
    }
}

#[test]
fn test_create_returns_initial_snapshot() {
    let registry = SessionRegistry::new();
    let created = registry.create(&request(3, 6, "round-robin")).unwrap();

    assert_eq!(created.state.current_step, 0);
    assert_eq!(created.state.completed_tasks, 0);
    assert!(created.state.tasks.iter().all(|t| !t.assigned));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_create_rejects_invalid_requests() {
    let registry = SessionRegistry::new();

    for bad in [
        request(0, 5, "round-robin"),
        request(2, 0, "round-robin"),
        request(-1, 5, "least-loaded"),
        request(2, 5, "shortest-queue"),
    ] {
        let err = registry.create(&bad).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfig(_)), "{:?}", bad);
    }

    let mut bad_workload = request(2, 2, "random");
    bad_workload.workload = Some(WorkloadDistribution::Fixed { units: 0 });
    assert!(matches!(
        registry.create(&bad_workload),
        Err(SimulationError::InvalidConfig(_))
    ));

    assert!(registry.is_empty(), "rejected creates must not leave sessions");
}

#[test]
fn test_end_to_end_round_robin() {
    let registry = SessionRegistry::new();
    let mut req = request(2, 2, "round-robin");
    req.workload = Some(WorkloadDistribution::Fixed { units: 1 });
    let created = registry.create(&req).unwrap();

    let outcome = registry.step(&created.session_id).unwrap();

    assert_eq!(outcome.state.tasks[0].worker_id, Some(0));
    assert_eq!(outcome.state.tasks[1].worker_id, Some(1));
    assert!(outcome.state.tasks.iter().all(|t| t.end_time == Some(0)));
    assert_eq!(outcome.state.completed_tasks, 2);
    assert!(outcome.complete);

    let metrics = outcome.metrics.unwrap();
    assert_eq!(metrics.total_time, 1);
    assert_eq!(metrics.efficiency, 100.0);
}

#[test]
fn test_step_unknown_session() {
    let registry = SessionRegistry::new();
    let other = SessionRegistry::new()
        .create(&request(1, 1, "random"))
        .unwrap()
        .session_id;

    let err = registry.step(&other).unwrap_err();
    assert_eq!(err, SimulationError::SessionNotFound(other.to_string()));
    assert!(matches!(registry.get(&other), Err(SimulationError::SessionNotFound(_))));
}

#[test]
fn test_step_after_reset_is_not_found() {
    let registry = SessionRegistry::new();
    let created = registry.create(&request(2, 4, "least-loaded")).unwrap();

    registry.step(&created.session_id).unwrap();
    registry.reset(&created.session_id);

    assert!(matches!(
        registry.step(&created.session_id),
        Err(SimulationError::SessionNotFound(_))
    ));
    // Idempotent
    registry.reset(&created.session_id);
}

#[test]
fn test_get_does_not_advance() {
    let registry = SessionRegistry::new();
    let created = registry.create(&request(2, 3, "static")).unwrap();

    registry.step(&created.session_id).unwrap();
    let a = registry.get(&created.session_id).unwrap();
    let b = registry.get(&created.session_id).unwrap();

    assert_eq!(a.current_step, 1);
    assert_eq!(a, b);
}

#[test]
fn test_session_ids_are_unique() {
    let registry = SessionRegistry::new();
    let ids: Vec<SessionId> = (0..50)
        .map(|_| registry.create(&request(1, 1, "round-robin")).unwrap().session_id)
        .collect();

    let mut unique = ids.clone();
    unique.sort_by_key(|id| id.to_string());
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn test_session_id_from_wire_string() {
    let registry = SessionRegistry::new();
    let created = registry.create(&request(2, 2, "random")).unwrap();

    let parsed: SessionId = created.session_id.to_string().parse().unwrap();
    assert!(registry.step(&parsed).is_ok());

    assert!(matches!(
        "1700000000.123".parse::<SessionId>(),
        Err(SimulationError::SessionNotFound(_))
    ));
}

#[test]
fn test_unseeded_sessions_still_run() {
    let registry = SessionRegistry::new();
    let mut req = request(3, 10, "random");
    req.seed = None;
    let created = registry.create(&req).unwrap();

    let mut outcome = registry.step(&created.session_id).unwrap();
    while !outcome.complete {
        outcome = registry.step(&created.session_id).unwrap();
    }
    assert!(outcome.metrics.is_some());
}

#[test]
fn test_concurrent_steps_on_one_session_serialize() {
    let registry = Arc::new(SessionRegistry::new());
    let created = registry
        .create_with_config(SimulationConfig {
            num_workers: 2,
            num_tasks: 4,
            strategy: StrategyKind::LeastLoaded,
            rng_seed: 1,
            workload: WorkloadDistribution::Fixed { units: 1000 },
        })
        .unwrap();
    let id = created.session_id;

    let steps_per_thread = 25;
    let observed: Vec<Vec<usize>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                scope.spawn(move || {
                    (0..steps_per_thread)
                        .map(|_| registry.step(&id).unwrap().state.current_step)
                        .collect::<Vec<usize>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // Every step observed a distinct step number: no two interleaved
    let mut all: Vec<usize> = observed.iter().flatten().copied().collect();
    all.sort_unstable();
    let expected: Vec<usize> = (1..=8 * steps_per_thread).collect();
    assert_eq!(all, expected);

    // Within a thread, step numbers strictly increase
    for seen in &observed {
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    assert_eq!(registry.get(&id).unwrap().current_step, 8 * steps_per_thread);
}

#[test]
fn test_independent_sessions_in_parallel() {
    let registry = Arc::new(SessionRegistry::new());

    let results: Vec<(SessionId, usize)> = thread::scope(|scope| {
        let handles: Vec<_> = StrategyKind::ALL
            .iter()
            .map(|kind| {
                let registry = Arc::clone(&registry);
                let kind = *kind;
                scope.spawn(move || {
                    let created = registry
                        .create(&request(3, 12, kind.as_str()))
                        .unwrap();
                    let mut steps = 0;
                    loop {
                        steps += 1;
                        if registry.step(&created.session_id).unwrap().complete {
                            break;
                        }
                    }
                    (created.session_id, steps)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(registry.len(), StrategyKind::ALL.len());
    for (id, steps) in results {
        assert_eq!(registry.get(&id).unwrap().current_step, steps);
        registry.reset(&id);
    }
    assert!(registry.is_empty());
}

#[test]
fn test_snapshot_json_field_names() {
    let registry = SessionRegistry::new();
    let created = registry.create(&request(1, 1, "round-robin")).unwrap();
    let outcome = registry.step(&created.session_id).unwrap();

    let json = serde_json::to_value(&outcome).unwrap();
    let state = &json["state"];
    assert!(state["current_step"].is_u64());
    assert!(state["completed_tasks"].is_u64());
    for key in ["id", "busy", "current_load", "total_processed", "tasks"] {
        assert!(state["workers"][0].get(key).is_some(), "worker missing {}", key);
    }
    for key in ["id", "workload", "assigned", "worker_id", "start_time", "end_time"] {
        assert!(state["tasks"][0].get(key).is_some(), "task missing {}", key);
    }

    let created_json = serde_json::to_value(&created).unwrap();
    assert!(created_json["session_id"].is_string());
}

#[test]
fn test_create_request_from_json() {
    let req: CreateRequest = serde_json::from_str(
        r#"{"num_workers": 4, "num_tasks": 10, "strategy": "least-loaded"}"#,
    )
    .unwrap();

    assert_eq!(req.seed, None);
    assert_eq!(req.workload, None);

    let registry = SessionRegistry::new();
    let created = registry.create(&req).unwrap();
    assert_eq!(created.state.workers.len(), 4);
}

#[test]
fn test_create_rejects_oversized_workloads() {
    let registry = SessionRegistry::new();

    let oversized = [
        (2, 3, WorkloadDistribution::Uniform { min: 1, max: u64::MAX }),
        (1, 2, WorkloadDistribution::Fixed { units: u64::MAX }),
        (1, 2, WorkloadDistribution::Fixed { units: MAX_WORKLOAD + 1 }),
        (2, 3, WorkloadDistribution::Normal { mean: 1e300, std_dev: 0.0 }),
        (2, 3, WorkloadDistribution::Normal { mean: 5.0, std_dev: 1e18 }),
    ];
    for (num_workers, num_tasks, workload) in oversized {
        let mut req = request(num_workers, num_tasks, "round-robin");
        req.workload = Some(workload.clone());
        let err = registry.create(&req).unwrap_err();
        assert!(
            matches!(err, SimulationError::InvalidConfig(_)),
            "{:?} gave {:?}",
            workload,
            err
        );
    }
    assert!(registry.is_empty());
}

#[test]
fn test_max_workload_session_steps_without_overflow() {
    let registry = SessionRegistry::new();
    let mut req = request(1, 2, "round-robin");
    req.workload = Some(WorkloadDistribution::Uniform { min: MAX_WORKLOAD, max: MAX_WORKLOAD });
    let created = registry.create(&req).unwrap();

    let outcome = registry.step(&created.session_id).unwrap();
    assert_eq!(outcome.state.workers[0].current_load, 2 * MAX_WORKLOAD - 2);
    assert!(!outcome.complete);
}

#[test]
fn test_create_rejects_counts_over_limit() {
    let registry = SessionRegistry::new();

    for bad in [
        request(2, 1_000_000_000_000, "round-robin"),
        request(2, MAX_TASKS as i64 + 1, "random"),
        request(MAX_WORKERS as i64 + 1, 5, "least-loaded"),
        request(i64::MAX, i64::MAX, "static"),
    ] {
        let err = registry.create(&bad).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfig(_)), "{:?}", bad);
    }
    assert!(registry.is_empty());

    let at_limit = registry.create(&request(MAX_WORKERS as i64, 1, "static"));
    assert!(at_limit.is_ok());
}

#[test]
fn test_prebuilt_simulation_is_stepped_through_registry() {
    let config = SimulationConfig {
        num_workers: 2,
        num_tasks: 3,
        strategy: StrategyKind::RoundRobin,
        rng_seed: 1,
        workload: WorkloadDistribution::default(),
    };
    let tasks = vec![Task::new(0, 2), Task::new(1, 1), Task::new(2, 1)];
    let simulation = Simulation::with_tasks(config, tasks).unwrap();

    let registry = SessionRegistry::new();
    let created = registry.create_from_simulation(simulation);
    assert_eq!(created.state.current_step, 0);
    assert!(registry.contains(&created.session_id));

    let mut outcome = registry.step(&created.session_id).unwrap();
    while !outcome.complete {
        outcome = registry.step(&created.session_id).unwrap();
    }

    let workloads: Vec<u64> = outcome.state.tasks.iter().map(|t| t.workload).collect();
    assert_eq!(workloads, vec![2, 1, 1]);
    assert_eq!(outcome.state.tasks[0].worker_id, Some(0));
    assert_eq!(outcome.state.tasks[1].worker_id, Some(1));
    assert_eq!(outcome.state.completed_tasks, 3);
    assert!(outcome.metrics.is_some());
}
