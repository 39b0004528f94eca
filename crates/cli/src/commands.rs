//! The `raftkv` command tree, built with clap's builder API.

use clap::{Arg, ArgAction, Command};

/// Build the top-level CLI.
pub fn build_cli() -> Command {
    Command::new("raftkv")
        .about("A three-node Raft-replicated key-value store")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("target-addr")
                .long("target-addr")
                .help("host:port of the node to talk to")
                .default_value("127.0.0.1:9100")
                .global(true),
        )
        .subcommand(
            Command::new("server")
                .about("Run this process as one cluster node")
                .arg(Arg::new("node-id").long("node-id").required(true))
                .arg(Arg::new("base-port").long("base-port").required(true))
                .arg(Arg::new("data-root").long("data-root").required(true))
                .arg(Arg::new("cluster-size").long("cluster-size").required(true))
                .arg(Arg::new("host").long("host").default_value("127.0.0.1")),
        )
        .subcommand(
            Command::new("create-table")
                .about("Create a table")
                .arg(Arg::new("table").long("table").required(true))
                .arg(Arg::new("partition-key").long("partition-key").required(true))
                .arg(Arg::new("sort-key").long("sort-key")),
        )
        .subcommand(
            Command::new("delete-table")
                .about("Delete a table")
                .arg(Arg::new("table").long("table").required(true)),
        )
        .subcommand(
            Command::new("put-item")
                .about("Write an item")
                .arg(Arg::new("table").long("table").required(true))
                .arg(
                    Arg::new("item")
                        .long("item")
                        .required(true)
                        .help("JSON object of attribute name to plain value"),
                ),
        )
        .subcommand(
            Command::new("get-item")
                .about("Read an item by key (local, eventually-consistent)")
                .arg(Arg::new("table").long("table").required(true))
                .arg(Arg::new("key").long("key").required(true)),
        )
        .subcommand(
            Command::new("delete-item")
                .about("Delete an item by key")
                .arg(Arg::new("table").long("table").required(true))
                .arg(Arg::new("key").long("key").required(true)),
        )
        .subcommand(
            Command::new("query-items")
                .about("Read every item sharing a partition key (local, eventually-consistent)")
                .arg(Arg::new("table").long("table").required(true))
                .arg(Arg::new("partition-key").long("partition-key").required(true)),
        )
        .subcommand(
            Command::new("status")
                .about("Show node identity and Raft role")
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_tree_is_well_formed() {
        build_cli().debug_assert();
    }

    #[test]
    fn put_item_requires_table_and_item() {
        let cli = build_cli();
        let result = cli.try_get_matches_from(["raftkv", "put-item"]);
        assert!(result.is_err());
    }

    #[test]
    fn target_addr_defaults_when_omitted() {
        let cli = build_cli();
        let matches = cli.try_get_matches_from(["raftkv", "status"]).unwrap();
        assert_eq!(matches.get_one::<String>("target-addr").unwrap(), "127.0.0.1:9100");
    }
}
