use clap::Args;
use clap::Parser;
use clap::Subcommand;
use ringlet_node::config;
use ringlet_node::logging::init_logging;
use ringlet_node::logging::LogLevel;
use ringlet_node::node::Node;
use ringlet_node::util::build_version;
use ringlet_node::util::expand_home;

#[derive(Parser, Debug)]
#[command(about, version, author)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, default_value_t = LogLevel::Info, value_enum, env = "RINGLET_LOG_LEVEL", global = true)]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    #[command(about = "Writes a config file with the default settings.")]
    Init(InitCommand),
    #[command(about = "Runs a node until Ctrl-C.")]
    Run(RunCommand),
}

#[derive(Args, Debug)]
struct InitCommand {
    #[arg(
        long,
        default_value = config::DEFAULT_CONFIG_LOCATION,
        help = "The location of config file"
    )]
    pub location: String,
}

#[derive(Args, Debug)]
struct RunCommand {
    #[arg(
        long,
        short = 'c',
        env = "RINGLET_CONFIG",
        help = "Config file location. Defaults to ~/.ringlet/config.yaml if it exists"
    )]
    pub config: Option<String>,

    #[arg(
        long,
        short = 'b',
        env = "RINGLET_BIND",
        help = "Listen address. If not provided, use bind_addr in config file or 127.0.0.1:50000"
    )]
    pub bind: Option<String>,

    #[arg(
        long,
        env = "RINGLET_ID",
        help = "Node id as 40 hex digits, or a seed to hash into one. Defaults to a hash of the advertised address"
    )]
    pub id: Option<String>,

    #[arg(
        long,
        env = "RINGLET_BOOTSTRAP",
        value_delimiter = ',',
        help = "Peers to join through, tried in order"
    )]
    pub bootstrap: Vec<String>,

    #[arg(
        long,
        env = "RINGLET_EXTERNAL_ADDR",
        help = "Address other peers reach this node at"
    )]
    pub external_addr: Option<String>,
}

impl RunCommand {
    fn load_config(&self) -> anyhow::Result<config::Config> {
        if let Some(path) = &self.config {
            return Ok(config::Config::read_fs(path)?);
        }
        if expand_home(config::DEFAULT_CONFIG_LOCATION)?.is_file() {
            return Ok(config::Config::read_fs(config::DEFAULT_CONFIG_LOCATION)?);
        }
        Ok(config::Config::default())
    }

    fn into_config(self) -> anyhow::Result<config::Config> {
        let mut c = self.load_config()?;
        if let Some(bind) = self.bind {
            c.bind_addr = bind;
        }
        if self.id.is_some() {
            c.id = self.id;
        }
        if !self.bootstrap.is_empty() {
            c.bootstrap = self.bootstrap;
        }
        if self.external_addr.is_some() {
            c.external_addr = self.external_addr;
        }
        Ok(c)
    }
}

async fn daemon_run(args: RunCommand) -> anyhow::Result<()> {
    let c = args.into_config()?;
    let node = Node::new(c).await?;
    println!("Node: {}", node.peer().identity());

    let inspect = node
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;
    println!("{}", serde_json::to_string_pretty(&inspect)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.log_level);
    tracing::debug!("ringlet {}", build_version());

    match cli.command {
        Command::Run(args) => daemon_run(args).await,
        Command::Init(args) => {
            if expand_home(&args.location)?.exists() {
                anyhow::bail!("{} already exists", args.location);
            }
            let p = config::Config::default().write_fs(args.location.as_str())?;
            println!("Your config file has saved to: {}", p);
            Ok(())
        }
    }
}
