//! action-echo demo binary.
//!
//! Echoes an action over the bundled in-process bus. A publisher thread
//! plays a synthetic goal lifecycle (goal submission, feedback ticks,
//! status transitions, result retrieval) so every interface produces
//! output. Ctrl+C stops the run.

use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use tokio::signal;
use uuid::Uuid;

use action_echo::{
    event_type, ActionInterface, ActionSchema, CancelToken, EchoConfig, EchoDispatcher,
    FormatOptions, LocalActionBus, RawEvent, TextFormatter, Value,
};

const DEFAULT_ACTION_TYPE: &str = "example_interfaces/action/Fibonacci";

struct Args {
    action_name: String,
    action_type: Option<String>,
    interfaces: Vec<String>,
    queue_size: usize,
    csv: bool,
    full_length: bool,
    truncate_length: usize,
    no_arr: bool,
    no_str: bool,
    flow_style: bool,
}

fn print_help() {
    println!("action-echo - echo the message streams of an action");
    println!();
    println!("USAGE:");
    println!("    action-echo <action_name> [action_type] [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -i, --interfaces <NAME>...    Interfaces to output: goal_service,");
    println!("                                  cancel_service, result_service,");
    println!("                                  feedback_topic, status_topic");
    println!("                                  [default: all]");
    println!("    -q, --queue-size <N>          Output queue length [default: 100]");
    println!("        --csv                     Output flattened fields separated by commas");
    println!("    -f, --full-length             Do not truncate arrays, bytes and strings");
    println!("    -l, --truncate-length <N>     Truncation length [default: 128]");
    println!("        --no-arr                  Don't print array fields");
    println!("        --no-str                  Don't print string fields");
    println!("        --flow-style              Print collections inline");
    println!("    -h, --help                    Print help information");
}

#[allow(clippy::too_many_lines)]
fn parse_args() -> Args {
    let argv: Vec<String> = std::env::args().collect();
    let mut args = Args {
        action_name: String::new(),
        action_type: None,
        interfaces: Vec::new(),
        queue_size: 100,
        csv: false,
        full_length: false,
        truncate_length: 128,
        no_arr: false,
        no_str: false,
        flow_style: false,
    };

    let take_value = |argv: &[String], i: usize| -> String {
        argv.get(i + 1).cloned().unwrap_or_else(|| {
            eprintln!("error: {} requires a value", argv[i]);
            std::process::exit(1);
        })
    };
    let parse_positive = |flag: &str, raw: &str| -> usize {
        match raw.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                eprintln!("error: {flag} must be a positive integer, got {raw}");
                std::process::exit(1);
            }
        }
    };

    let mut i = 1;
    while i < argv.len() {
        match argv[i].as_str() {
            "--interfaces" | "-i" => {
                i += 1;
                while i < argv.len() && !argv[i].starts_with('-') {
                    args.interfaces.push(argv[i].clone());
                    i += 1;
                }
            }
            "--queue-size" | "-q" => {
                args.queue_size = parse_positive("--queue-size", &take_value(&argv, i));
                i += 2;
            }
            "--truncate-length" | "-l" => {
                args.truncate_length = parse_positive("--truncate-length", &take_value(&argv, i));
                i += 2;
            }
            "--csv" => {
                args.csv = true;
                i += 1;
            }
            "--full-length" | "-f" => {
                args.full_length = true;
                i += 1;
            }
            "--no-arr" => {
                args.no_arr = true;
                i += 1;
            }
            "--no-str" => {
                args.no_str = true;
                i += 1;
            }
            "--flow-style" => {
                args.flow_style = true;
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg if arg.starts_with('-') => {
                eprintln!("error: unknown argument: {arg}");
                std::process::exit(1);
            }
            arg => {
                if args.action_name.is_empty() {
                    args.action_name = arg.to_string();
                } else if args.action_type.is_none() {
                    args.action_type = Some(arg.to_string());
                } else {
                    eprintln!("error: unexpected argument: {arg}");
                    std::process::exit(1);
                }
                i += 1;
            }
        }
    }

    if args.action_name.is_empty() {
        eprintln!("error: an action name is required (e.g. '/fibonacci')");
        std::process::exit(1);
    }
    args
}

/// Plays one goal lifecycle per loop until cancelled.
fn demo_publisher(bus: &LocalActionBus, schema: &ActionSchema, cancel: &CancelToken) {
    let goal_channel = schema.channel(ActionInterface::GoalService).name;
    let result_channel = schema.channel(ActionInterface::ResultService).name;
    let feedback_channel = schema.channel(ActionInterface::FeedbackTopic).name;
    let status_channel = schema.channel(ActionInterface::StatusTopic).name;

    let step = Duration::from_millis(500);
    let mut sequence_number = 0i64;

    while !cancel.is_cancelled() {
        let goal_id = Uuid::new_v4();
        let client = Uuid::new_v4();
        let order = 6i64;

        let request = Value::Map(vec![
            ("goal_id".to_string(), Value::String(goal_id.to_string())),
            (
                "goal".to_string(),
                Value::Map(vec![("order".to_string(), Value::Int(order))]),
            ),
        ]);
        for kind in [event_type::REQUEST_SENT, event_type::REQUEST_RECEIVED] {
            sequence_number += 1;
            let info =
                action_echo::event::service_event_info(kind, Utc::now(), client, sequence_number);
            let envelope =
                action_echo::event::service_event(info, vec![request.clone()], vec![]);
            bus.publish(&goal_channel, &RawEvent::new(envelope));
        }
        publish_status(bus, &status_channel, goal_id, 2); // EXECUTING
        if cancel.wait(step) {
            return;
        }

        // Feedback ticks with a growing partial sequence.
        let mut sequence = vec![0i64, 1];
        for _ in 0..order.min(4) {
            let next = sequence[sequence.len() - 1] + sequence[sequence.len() - 2];
            sequence.push(next);
            let feedback = Value::Map(vec![
                ("goal_id".to_string(), Value::String(goal_id.to_string())),
                (
                    "feedback".to_string(),
                    Value::Map(vec![(
                        "partial_sequence".to_string(),
                        Value::Array(sequence.iter().copied().map(Value::Int).collect()),
                    )]),
                ),
            ]);
            bus.publish(&feedback_channel, &RawEvent::new(feedback));
            if cancel.wait(step) {
                return;
            }
        }

        // Result retrieval and terminal status.
        for kind in [event_type::RESPONSE_SENT, event_type::RESPONSE_RECEIVED] {
            sequence_number += 1;
            let info =
                action_echo::event::service_event_info(kind, Utc::now(), client, sequence_number);
            let response = Value::Map(vec![
                ("status".to_string(), Value::Int(4)), // SUCCEEDED
                (
                    "result".to_string(),
                    Value::Map(vec![(
                        "sequence".to_string(),
                        Value::Array(sequence.iter().copied().map(Value::Int).collect()),
                    )]),
                ),
            ]);
            let envelope = action_echo::event::service_event(info, vec![], vec![response]);
            bus.publish(&result_channel, &RawEvent::new(envelope));
        }
        publish_status(bus, &status_channel, goal_id, 4); // SUCCEEDED
        if cancel.wait(step) {
            return;
        }
    }
}

fn publish_status(bus: &LocalActionBus, channel: &str, goal_id: Uuid, status: i64) {
    let message = Value::Map(vec![(
        "status_list".to_string(),
        Value::Array(vec![Value::Map(vec![
            (
                "goal_info".to_string(),
                Value::Map(vec![(
                    "goal_id".to_string(),
                    Value::String(goal_id.to_string()),
                )]),
            ),
            ("status".to_string(), Value::Int(status)),
        ])]),
    )]);
    bus.publish(channel, &RawEvent::new(message));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = parse_args();

    let interfaces = match EchoConfig::parse_interfaces(&args.interfaces) {
        Ok(interfaces) => interfaces,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let format = FormatOptions {
        csv: args.csv,
        truncate_length: if args.full_length {
            None
        } else {
            Some(args.truncate_length)
        },
        no_arr: args.no_arr,
        no_str: args.no_str,
        flow_style: args.flow_style,
    };

    let mut config = EchoConfig::new(args.action_name.clone());
    config.action_type = args.action_type.clone();
    config.interfaces = interfaces;
    config.queue_size = args.queue_size;
    config.format = format.clone();

    // The demo bus serves whatever action was named.
    let bus = LocalActionBus::new();
    bus.register_action(
        &args.action_name,
        args.action_type.as_deref().unwrap_or(DEFAULT_ACTION_TYPE),
    );
    let schema = ActionSchema::new(
        &args.action_name,
        args.action_type.as_deref().unwrap_or(DEFAULT_ACTION_TYPE),
    );

    let cancel = CancelToken::new();
    let dispatcher = Arc::new(EchoDispatcher::new(
        config,
        Arc::new(bus.clone()),
        Arc::new(TextFormatter::new(format)),
    ));

    let publisher = {
        let bus = bus.clone();
        let schema = schema.clone();
        let cancel = cancel.clone();
        thread::spawn(move || demo_publisher(&bus, &schema, &cancel))
    };

    eprintln!("Echoing {} (Ctrl+C to stop)", args.action_name);

    let mut runner = {
        let dispatcher = Arc::clone(&dispatcher);
        let bus = bus.clone();
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || {
            dispatcher.run(&bus, Box::new(std::io::stdout()), &cancel)
        })
    };

    let outcome = tokio::select! {
        result = &mut runner => result.expect("dispatcher thread panicked"),
        _ = signal::ctrl_c() => {
            // Let the dispatcher finish draining before the process exits.
            cancel.cancel();
            runner.await.expect("dispatcher thread panicked")
        }
    };

    cancel.cancel();
    let _ = publisher.join();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
