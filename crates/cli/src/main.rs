//! `raftkv`: run a cluster node, or talk to one as a client.

mod client;
mod commands;
mod format;
mod value;

use std::path::PathBuf;
use std::process::ExitCode;

use client::ApiClient;
use commands::build_cli;
use format::{print_client_error, print_success, print_usage_error, EXIT_OK, EXIT_USAGE_ERROR};
use raftkv_node::NodeConfig;
use value::parse_attribute_map;

fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    let target_addr = matches.get_one::<String>("target-addr").expect("has default").clone();

    let Some((name, sub)) = matches.subcommand() else {
        return ExitCode::from(EXIT_USAGE_ERROR as u8);
    };

    if name == "server" {
        return run_server(sub);
    }

    let rt = tokio::runtime::Runtime::new().expect("failed to start async runtime");
    let code = rt.block_on(run_client_command(&target_addr, name, sub));
    ExitCode::from(code as u8)
}

fn run_server(sub: &clap::ArgMatches) -> ExitCode {
    let parsed = (|| -> Result<NodeConfig, String> {
        let node_id = arg_u64(sub, "node-id")?;
        let base_port = arg_u16(sub, "base-port")?;
        let cluster_size = arg_u64(sub, "cluster-size")?;
        let data_root = PathBuf::from(sub.get_one::<String>("data-root").expect("required"));
        let host = sub.get_one::<String>("host").expect("has default").clone();
        Ok(NodeConfig { node_id, base_port, data_root, cluster_size, host })
    })();

    let config = match parsed {
        Ok(c) => c,
        Err(e) => return ExitCode::from(print_usage_error(&e) as u8),
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let rt = tokio::runtime::Runtime::new().expect("failed to start async runtime");
    match rt.block_on(raftkv_node::run_node(config)) {
        Ok(()) => ExitCode::from(EXIT_OK as u8),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(format::EXIT_APP_ERROR as u8)
        }
    }
}

async fn run_client_command(target_addr: &str, name: &str, sub: &clap::ArgMatches) -> i32 {
    let client = ApiClient::new(target_addr);
    let as_json = sub.get_flag_or_false("json");

    let result = match name {
        "create-table" => {
            let table = sub.get_one::<String>("table").expect("required");
            let partition_key = sub.get_one::<String>("partition-key").expect("required");
            let sort_key = sub.get_one::<String>("sort-key").map(String::as_str);
            client.create_table(table, partition_key, sort_key).await
        }
        "delete-table" => {
            let table = sub.get_one::<String>("table").expect("required");
            client.delete_table(table).await
        }
        "put-item" => {
            let table = sub.get_one::<String>("table").expect("required");
            let raw = sub.get_one::<String>("item").expect("required");
            match parse_attribute_map(raw) {
                Ok(item) => client.put_item(table, item).await,
                Err(e) => return print_usage_error(&e),
            }
        }
        "get-item" => {
            let table = sub.get_one::<String>("table").expect("required");
            let raw = sub.get_one::<String>("key").expect("required");
            match parse_attribute_map(raw) {
                Ok(key) => client.get_item(table, key).await,
                Err(e) => return print_usage_error(&e),
            }
        }
        "delete-item" => {
            let table = sub.get_one::<String>("table").expect("required");
            let raw = sub.get_one::<String>("key").expect("required");
            match parse_attribute_map(raw) {
                Ok(key) => client.delete_item(table, key).await,
                Err(e) => return print_usage_error(&e),
            }
        }
        "query-items" => {
            let table = sub.get_one::<String>("table").expect("required");
            let raw = sub.get_one::<String>("partition-key").expect("required");
            match parse_attribute_map(raw) {
                Ok(pk) => client.query_items(table, pk).await,
                Err(e) => return print_usage_error(&e),
            }
        }
        "status" => client.status().await,
        other => return print_usage_error(&format!("unknown command: {}", other)),
    };

    match result {
        Ok(body) => {
            print_success(&body, as_json);
            EXIT_OK
        }
        Err(e) => print_client_error(&e),
    }
}

fn arg_u64(sub: &clap::ArgMatches, name: &str) -> Result<u64, String> {
    sub.get_one::<String>(name)
        .expect("required")
        .parse()
        .map_err(|_| format!("--{} must be a non-negative integer", name))
}

fn arg_u16(sub: &clap::ArgMatches, name: &str) -> Result<u16, String> {
    sub.get_one::<String>(name)
        .expect("required")
        .parse()
        .map_err(|_| format!("--{} must be a 16-bit port number", name))
}

trait ArgMatchesExt {
    fn get_flag_or_false(&self, id: &str) -> bool;
}

impl ArgMatchesExt for clap::ArgMatches {
    fn get_flag_or_false(&self, id: &str) -> bool {
        self.get_one::<bool>(id).copied().unwrap_or(false)
    }
}
