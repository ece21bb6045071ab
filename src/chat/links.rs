//! Links to the source documents an answer was drawn from.
//!
//! Retrieved file names are matched against a fixed set of name
//! fragments, each pointing at the canonical copy of that document.

use serde::Serialize;

use crate::index::SourceNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SourceLink {
    #[serde(skip)]
    pub fragment: &'static str,
    #[serde(skip)]
    pub prefix: &'static str,
    pub title: &'static str,
    pub url: &'static str,
    /// Stop looking at further sources once this link matches
    #[serde(skip)]
    pub halts: bool,
}

impl SourceLink {
    pub fn markdown(&self) -> String {
        format!("{} [{}]({})", self.prefix, self.title, self.url)
    }
}

/// Checked in order, the first fragment contained in a file name wins.
pub const SOURCE_LINKS: [SourceLink; 4] = [
    SourceLink {
        fragment: "Bar",
        prefix: "Guarda questo documento:",
        title: "Kontiki Bar e Servizio",
        url: "https://docs.google.com/document/d/13P4xlpopMB81XRbelK_A9eBGWO9zmiPKf_2PozQdiqY/edit",
        halts: false,
    },
    SourceLink {
        fragment: "Ricettario",
        prefix: "Guarda questo documento:",
        title: "Kontiki Ricettario",
        url: "https://docs.google.com/document/d/1lju2IPflfzaxF5x0BpCd5V6z1qZm1VB71eKTgFRmNKM/edit",
        halts: false,
    },
    SourceLink {
        fragment: "frighi",
        prefix: "Guarda questo documento:",
        title: "Kontiki Frighi e magazzino",
        url: "https://docs.google.com/document/d/1y-k-nclI3btENprJNMok8qA6RPqFUIJGL21MtkFqsZo/edit",
        halts: false,
    },
    SourceLink {
        fragment: "generali",
        prefix: "Guarda il nostro sito:",
        title: "Kontiki",
        url: "https://kontiki.giustiziaclimaticaora.it/",
        halts: true,
    },
];

pub fn link_for_file_name(file_name: &str) -> Option<&'static SourceLink> {
    SOURCE_LINKS
        .iter()
        .find(|link| file_name.contains(link.fragment))
}

/// Collect links for `sources` in retrieval order. Sources without a
/// file name or without a known fragment are skipped. Duplicates are
/// kept. The site link ends the scan.
pub fn annotate(sources: &[SourceNode]) -> Vec<SourceLink> {
    let mut links = Vec::new();
    for source in sources {
        let Some(file_name) = source.file_name() else {
            tracing::debug!("Source {} has no file name, skipping", source.node_id);
            continue;
        };
        let Some(link) = link_for_file_name(file_name) else {
            continue;
        };
        links.push(*link);
        if link.halts {
            break;
        }
    }
    links
}
