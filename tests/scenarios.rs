use std::{num::NonZeroUsize, path::PathBuf};

use a3c_launch::{ExecutionMode, Invocation, LaunchConfig, LaunchError, Topology, plan};

fn local_config(workers: usize, mode: ExecutionMode) -> LaunchConfig {
    let mut cfg = LaunchConfig::new(Topology::Local {
        workers: NonZeroUsize::new(workers).unwrap(),
    });
    cfg.mode = mode;
    cfg.log_dir = PathBuf::from("/tmp/pong");
    cfg
}

fn invocation() -> Invocation {
    Invocation::from_args(["a3c-launch", "-w", "1", "-n"])
}

const PS_CMD: &str = "CUDA_VISIBLE_DEVICES= python3 worker.py --log-dir /tmp/pong \
     --env-id PongDeterministic-v3 --workers 127.0.0.1:12222,127.0.0.1:12223 --job-name ps";

#[test]
fn single_worker_tmux_session() {
    let plan = plan(&local_config(1, ExecutionMode::Multiplexed), &invocation()).unwrap();

    let expected = [
        "mkdir -p /tmp/pong".to_string(),
        r"printf '%s\n' 'a3c-launch -w 1' > /tmp/pong/cmd.sh".to_string(),
        "tmux kill-session -t a3c".to_string(),
        "tmux new-session -s a3c -n ps -d bash".to_string(),
        "tmux new-window -t a3c -n w-0 bash".to_string(),
        "tmux new-window -t a3c -n tb bash".to_string(),
        "tmux new-window -t a3c -n htop bash".to_string(),
        "sleep 1".to_string(),
        format!("tmux send-keys -t a3c:ps '{PS_CMD}' Enter"),
        "tmux send-keys -t a3c:w-0 'CUDA_VISIBLE_DEVICES= python3 worker.py --log-dir /tmp/pong \
         --env-id PongDeterministic-v3 --workers 127.0.0.1:12222,127.0.0.1:12223 \
         --job-name worker --task 0 --remotes 1' Enter"
            .to_string(),
        "tmux send-keys -t a3c:tb 'tensorboard --logdir /tmp/pong --port 12345' Enter".to_string(),
        "tmux send-keys -t a3c:htop htop Enter".to_string(),
    ];
    assert_eq!(plan.commands, expected);

    assert!(plan.commands.iter().all(|c| !c.contains("kill.sh")));
    let send_keys = plan
        .commands
        .iter()
        .filter(|c| c.starts_with("tmux send-keys"))
        .count();
    assert_eq!(send_keys, 4);
}

#[test]
fn foreground_workers_bound_to_remotes() {
    let mut cfg = local_config(2, ExecutionMode::Foreground);
    cfg.remotes = Some("5,6".into());
    let plan = plan(&cfg, &invocation()).unwrap();

    let bootstrap = "echo '#!/bin/sh' >/tmp/pong/kill.sh && chmod +x /tmp/pong/kill.sh";
    let bootstraps: Vec<_> = plan
        .commands
        .iter()
        .enumerate()
        .filter(|(_, c)| c.as_str() == bootstrap)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(bootstraps, [2]);

    let first_task = plan
        .commands
        .iter()
        .position(|c| c.starts_with("CUDA_VISIBLE_DEVICES="))
        .unwrap();
    assert!(bootstraps[0] < first_task);

    let workers: Vec<_> = plan
        .commands
        .iter()
        .filter(|c| c.contains("--job-name worker"))
        .collect();
    assert_eq!(workers.len(), 2);
    assert!(workers[0].contains("--task 0 --remotes 5 >/tmp/pong/a3c.w-0.out 2>&1 &"));
    assert!(workers[1].contains("--task 1 --remotes 6 >/tmp/pong/a3c.w-1.out 2>&1 &"));

    assert!(plan.commands.iter().all(|c| !c.contains("htop")));
    let kills = plan
        .commands
        .iter()
        .filter(|c| c.ends_with("echo kill $! >>/tmp/pong/kill.sh"))
        .count();
    assert_eq!(kills, 4);
}

#[test]
fn remote_count_mismatch_fails_before_rendering() {
    let mut cfg = local_config(2, ExecutionMode::Multiplexed);
    cfg.remotes = Some("only-one".into());

    match plan(&cfg, &invocation()) {
        Err(LaunchError::TopologyMismatch { expected, got }) => {
            assert_eq!(expected, 2);
            assert_eq!(got, 1);
        }
        other => panic!("expected TopologyMismatch, got {other:?}"),
    }
}

#[test]
fn explicit_endpoints_supersede_worker_count() {
    let mut cfg = LaunchConfig::new(Topology::Explicit {
        endpoints: vec!["ps-host:2222".into(), "w0:2222".into(), "w1:2222".into()],
    });
    cfg.mode = ExecutionMode::Detached;
    cfg.remotes = Some("vnc://w0:5900+15900,vnc://w1:5900+15900".into());
    let plan = plan(&cfg, &invocation()).unwrap();

    let tasks: Vec<_> = plan
        .commands
        .iter()
        .filter(|c| c.starts_with("nohup bash -c "))
        .collect();
    assert_eq!(tasks.len(), 4);
    assert!(tasks.iter().all(|c| c.contains("--workers ps-host:2222,w0:2222,w1:2222")));
    assert!(tasks[2].contains("--task 1 --remotes vnc://w1:5900+15900"));
    assert!(tasks[3].contains("tensorboard"));
}

#[test]
fn plans_are_reproducible() {
    for mode in [
        ExecutionMode::Multiplexed,
        ExecutionMode::Detached,
        ExecutionMode::Foreground,
    ] {
        let cfg = local_config(3, mode);
        assert_eq!(
            plan(&cfg, &invocation()).unwrap(),
            plan(&cfg, &invocation()).unwrap()
        );
    }
}

#[test]
fn unsupported_mode_is_rejected() {
    let err = "screen".parse::<ExecutionMode>().unwrap_err();
    assert!(matches!(err, LaunchError::UnsupportedMode(_)));
    assert!(err.to_string().contains("screen"));
}
