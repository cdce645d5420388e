//! Interactive browse session.
//!
//! Reads one command per line. Search edits are debounced: a burst of
//! `search` lines within the quiet period runs a single filter pass with the
//! last text.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use course_catalog::core::debounce::Debouncer;
use course_catalog::core::filter::SearchMode;
use course_catalog::core::render::text::render_listing;
use course_catalog::core::render::ViewMode;
use course_catalog::core::sort::SortKey;
use course_catalog::core::state::{Facet, FilterTag, ListingState};
use course_catalog::debug;

const HELP: &str = "\
Commands:
  search <text>           search title, description and tools (blank clears)
  mode words|relevance    switch search mode
  filter <facet> <value>  add a filter (track, domain, level, status, tool,
                          duration, price, rating)
  remove <facet> <value>  remove an active filter tag
  clear                   clear all filters
  sort <key>              title, level, duration, durationDesc, status,
                          popular, rating, priceAsc, priceDesc, newest
  view <view>             grid, list, track, domain, category, industrial
  page <n> | next | prev  move between pages
  toggle <group>          expand or collapse a group
  show | json             print the listing
  help | quit";

/// One parsed command line
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Replace the search text
    Search(String),
    /// Switch search mode
    Mode(SearchMode),
    /// Add a filter value
    Filter(Facet, String),
    /// Remove an active tag
    Remove(FilterTag),
    /// Clear all filters
    Clear,
    /// Change sort key
    Sort(SortKey),
    /// Change view
    View(ViewMode),
    /// Jump to a page
    Page(usize),
    /// Next page
    Next,
    /// Previous page
    Prev,
    /// Expand or collapse a group
    Toggle(String),
    /// Print the listing as text
    Show,
    /// Print the listing as JSON
    Json,
    /// Print help
    Help,
    /// End the session
    Quit,
}

fn facet_and_value(rest: &str) -> Result<(Facet, String), String> {
    let (facet, value) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| "Expected <facet> <value>".to_string())?;
    Ok((facet.parse()?, value.trim().to_string()))
}

/// Parse one command line
pub fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(c, r)| (c, r.trim()));
    match command.to_lowercase().as_str() {
        "search" | "s" => Ok(Input::Search(rest.to_string())),
        "mode" => match rest.to_lowercase().as_str() {
            "words" | "all" => Ok(Input::Mode(SearchMode::AllWords)),
            "relevance" => Ok(Input::Mode(SearchMode::Relevance)),
            _ => Err(format!("Unknown search mode: {rest}")),
        },
        "filter" | "f" => facet_and_value(rest).map(|(f, v)| Input::Filter(f, v)),
        "remove" | "rm" => facet_and_value(rest).map(|(f, v)| Input::Remove(FilterTag::new(f, v))),
        "clear" => Ok(Input::Clear),
        "sort" => rest.parse().map(Input::Sort),
        "view" => rest.parse().map(Input::View),
        "page" => rest
            .parse()
            .map(Input::Page)
            .map_err(|_| format!("Invalid page: {rest}")),
        "next" | "n" => Ok(Input::Next),
        "prev" | "p" => Ok(Input::Prev),
        "toggle" | "t" if !rest.is_empty() => Ok(Input::Toggle(rest.to_string())),
        "show" | "" => Ok(Input::Show),
        "json" => Ok(Input::Json),
        "help" | "?" => Ok(Input::Help),
        "quit" | "q" | "exit" => Ok(Input::Quit),
        _ => Err(format!("Unknown command: {line} (try 'help')")),
    }
}

/// What the session should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Render,
    Silent,
    Quit,
}

fn apply(state: &mut ListingState, input: Input) -> Outcome {
    match input {
        Input::Search(text) => state.set_search(&text),
        Input::Mode(mode) => state.set_search_mode(mode),
        Input::Filter(facet, value) => match state.add_filter(facet, &value) {
            Ok(true) => {}
            Ok(false) => println!("Filter already applied"),
            Err(e) => {
                eprintln!("✗ {e}");
                return Outcome::Silent;
            }
        },
        Input::Remove(tag) => {
            if !state.remove_filter(&tag) {
                eprintln!("✗ No active filter {tag}");
                return Outcome::Silent;
            }
        }
        Input::Clear => state.clear_filters(),
        Input::Sort(key) => state.set_sort(key),
        Input::View(view) => state.set_view(view),
        Input::Page(page) => {
            if !state.go_to_page(page) {
                eprintln!("✗ Page {page} is out of range");
                return Outcome::Silent;
            }
        }
        Input::Next => {
            if !state.next_page() {
                return Outcome::Silent;
            }
        }
        Input::Prev => {
            if !state.prev_page() {
                return Outcome::Silent;
            }
        }
        Input::Toggle(group) => {
            state.toggle_group(&group);
        }
        Input::Show => {}
        Input::Json => {
            match serde_json::to_string_pretty(&state.snapshot()) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("✗ {e}"),
            }
            return Outcome::Silent;
        }
        Input::Help => {
            println!("{HELP}");
            return Outcome::Silent;
        }
        Input::Quit => return Outcome::Quit,
    }
    Outcome::Render
}

fn prompt() {
    print!("catalog> ");
    io::stdout().flush().ok();
}

fn render(state: &ListingState) {
    print!("{}", render_listing(state));
    prompt();
}

/// Run the session until `quit` or end of input
pub fn run(state: &mut ListingState, quiet: Duration) {
    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut searches: Debouncer<String> = Debouncer::new(quiet);
    render(state);
    loop {
        let received = match searches.deadline() {
            Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        let line = match received {
            Ok(line) => line,
            Err(RecvTimeoutError::Timeout) => {
                if let Some(text) = searches.poll(Instant::now()) {
                    state.set_search(&text);
                    render(state);
                }
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => {
                if let Some(text) = searches.flush() {
                    state.set_search(&text);
                    render(state);
                }
                println!();
                break;
            }
        };

        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("✗ {e}");
                prompt();
                continue;
            }
        };
        if let Input::Search(text) = input {
            debug!("Search edit queued: '{text}'");
            searches.push(text, Instant::now());
            continue;
        }
        // pending search applies before any other control
        if let Some(text) = searches.flush() {
            state.set_search(&text);
        }
        match apply(state, input) {
            Outcome::Render => render(state),
            Outcome::Silent => prompt(),
            Outcome::Quit => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_catalog::core::indexer::Dimension;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_input("search  machine learning ").unwrap(),
            Input::Search("machine learning".into())
        );
        assert_eq!(parse_input("search").unwrap(), Input::Search(String::new()));
        assert_eq!(
            parse_input("filter domain Computer Vision").unwrap(),
            Input::Filter(Facet::Domain, "Computer Vision".into())
        );
        assert_eq!(
            parse_input("remove track Generative AI").unwrap(),
            Input::Remove(FilterTag::new(Facet::Track, "Generative AI"))
        );
        assert_eq!(parse_input("view track").unwrap(), Input::View(ViewMode::Grouped(Dimension::Track)));
        assert_eq!(parse_input("sort priceAsc").unwrap(), Input::Sort(SortKey::PriceAsc));
        assert_eq!(parse_input("page 3").unwrap(), Input::Page(3));
        assert_eq!(parse_input("").unwrap(), Input::Show);
        assert_eq!(parse_input("mode relevance").unwrap(), Input::Mode(SearchMode::Relevance));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_input("filter domain").is_err());
        assert!(parse_input("filter colour red").is_err());
        assert!(parse_input("page two").is_err());
        assert!(parse_input("toggle").is_err());
        assert!(parse_input("dance").is_err());
    }
}
