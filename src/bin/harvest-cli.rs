use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "harvest-cli")]
#[command(about = "Command-line client for the harvest API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported data sources
    Sources,
    /// Brute force subdomains of a domain
    Dnsbrute {
        domain: String,
    },
    /// Run a full harvest
    Query {
        domain: String,

        /// Data sources, comma separated
        #[arg(short, long, required = true, value_delimiter = ',')]
        source: Vec<String>,

        #[arg(short, long, default_value_t = 500)]
        limit: u32,

        #[arg(short = 'S', long, default_value_t = 0)]
        start: u32,

        #[arg(long)]
        dns_brute: bool,

        #[arg(long)]
        dns_lookup: bool,

        #[arg(long)]
        dns_tld: bool,

        #[arg(long)]
        google_dork: bool,

        #[arg(long)]
        proxies: bool,

        #[arg(long)]
        shodan: bool,

        #[arg(long)]
        take_over: bool,

        #[arg(long)]
        virtual_host: bool,

        #[arg(long)]
        dns_server: Option<String>,

        #[arg(short, long)]
        filename: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Sources => client.get(format!("{}/sources", base)),
        Commands::Dnsbrute { domain } => client
            .get(format!("{}/dnsbrute", base))
            .query(&[("domain", domain)]),
        Commands::Query {
            domain,
            source,
            limit,
            start,
            dns_brute,
            dns_lookup,
            dns_tld,
            google_dork,
            proxies,
            shodan,
            take_over,
            virtual_host,
            dns_server,
            filename,
        } => {
            let mut params = vec![
                ("domain", domain),
                ("source", source.join(",")),
                ("limit", limit.to_string()),
                ("start", start.to_string()),
            ];
            for (name, enabled) in [
                ("dns_brute", dns_brute),
                ("dns_lookup", dns_lookup),
                ("dns_tld", dns_tld),
                ("google_dork", google_dork),
                ("proxies", proxies),
                ("shodan", shodan),
                ("take_over", take_over),
                ("virtual_host", virtual_host),
            ] {
                if enabled {
                    params.push((name, "true".to_string()));
                }
            }
            if let Some(server) = dns_server {
                params.push(("dns_server", server));
            }
            if let Some(name) = filename {
                params.push(("filename", name));
            }
            client.get(format!("{}/query", base)).query(&params)
        }
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
