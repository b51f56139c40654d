//! Data sources the harvester ships with.

/// Identifiers accepted by the harvester's `-b` option.
pub const SUPPORTED_SOURCES: &[&str] = &[
    "anubis",
    "baidu",
    "bevigil",
    "binaryedge",
    "bing",
    "bingapi",
    "bufferoverun",
    "censys",
    "certspotter",
    "crtsh",
    "dnsdumpster",
    "duckduckgo",
    "fullhunt",
    "github-code",
    "hackertarget",
    "hunter",
    "intelx",
    "omnisint",
    "otx",
    "pentesttools",
    "projectdiscovery",
    "qwant",
    "rapiddns",
    "rocketreach",
    "securityTrails",
    "sublist3r",
    "threatcrowd",
    "threatminer",
    "urlscan",
    "virustotal",
    "yahoo",
    "zoomeye",
];

/// Pseudo-source that expands to every supported source.
pub const ALL_SOURCES: &str = "all";
