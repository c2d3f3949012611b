// tests/common/mod.rs
//
// In-memory stand-ins for the network, the clock and the summary service.
//
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use hiscore_locate::core::{HttpResponse, Transport, TransportError};
use hiscore_locate::lowest::{Clock, LowestRankSource, NoSource};
use hiscore_locate::{AccountCategory, Engine, EngineOptions, Game};

#[derive(Clone)]
pub enum Reply {
    Body(String),
    Status(u16),
    Timeout,
}

/// Serves registered URLs; everything else is a 404. Records every request.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, Reply>>,
    hits: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, url: impl Into<String>, reply: Reply) {
        self.routes.lock().unwrap().insert(url.into(), reply);
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hit_count(&self, needle: &str) -> usize {
        self.hits().iter().filter(|u| u.contains(needle)).count()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.hits.lock().unwrap().push(url.to_string());
        match self.routes.lock().unwrap().get(url).cloned() {
            Some(Reply::Body(body)) => Ok(HttpResponse::ok(body)),
            Some(Reply::Status(status)) => Ok(HttpResponse { status, body: String::new() }),
            Some(Reply::Timeout) => Err(TransportError::TimedOut),
            None => Ok(HttpResponse { status: 404, body: String::new() }),
        }
    }
}

pub struct FakeClock(Mutex<DateTime<Utc>>);

impl FakeClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap())))
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.0.lock().unwrap();
        *now = *now + chrono::TimeDelta::seconds(secs);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Hands out a fixed summary and counts how often it was asked.
pub struct CountingSource {
    pub summary: Option<HashMap<AccountCategory, u32>>,
    pub calls: Arc<Mutex<usize>>,
}

impl LowestRankSource for CountingSource {
    fn fetch_summary(&self) -> Option<HashMap<AccountCategory, u32>> {
        *self.calls.lock().unwrap() += 1;
        self.summary.clone()
    }
}

pub fn engine(game: Game, transport: Arc<FakeTransport>) -> Engine {
    Engine::with_parts(EngineOptions::new(game), transport, Box::new(NoSource), FakeClock::new())
}

pub fn engine_with_source(
    game: Game,
    transport: Arc<FakeTransport>,
    source: Box<dyn LowestRankSource>,
    clock: Arc<FakeClock>,
) -> Engine {
    Engine::with_parts(EngineOptions::new(game), transport, source, clock)
}

/// A lite body whose overall triple carries `xp`, followed by a few skills.
pub fn stats_body(xp: i64) -> String {
    let mut body = format!("1234,1500,{xp}\n");
    for _ in 0..23 {
        body.push_str("-1,1,0\n");
    }
    body.push_str("-1,-1\n-1,-1\n");
    body
}

pub fn serve_stats(t: &FakeTransport, e: &Engine, category: AccountCategory, name: &str, reply: Reply) {
    let url = e.fetcher().stats_url(category, name).unwrap();
    t.route(url, reply);
}

pub fn xp(n: i64) -> Reply {
    Reply::Body(stats_body(n))
}

/// Old School listing page with the given `(rank, name, dead)` rows.
pub fn osrs_page(rows: &[(u32, &str, bool)]) -> String {
    let mut html = String::from(
        "<html><head><title>Hiscores</title></head><body><div class=\"personal-hiscores\"><table><tbody>\n",
    );
    for (rank, name, dead) in rows {
        let death = if *dead { r#"<img class="hiscore-death" src="/img/hcim_death.png" title="Died">"# } else { "" };
        html.push_str(&format!(
            "<tr class=\"personal-hiscores__row\"><td class=\"right\">{}</td>\
             <td class=\"left\"><a href=\"hiscorepersonal?user1={name}\">{name}</a>{death}</td>\
             <td class=\"right\">2,277</td><td class=\"right\">200,000,000</td></tr>\n",
            group(*rank)
        ));
    }
    html.push_str("</tbody></table></div></body></html>");
    html
}

/// Full page `page` of a ranking with `size` rows; names are `P<rank>`.
pub fn osrs_full_page(page: u32, size: u32) -> String {
    let first = (page - 1) * size + 1;
    let names: Vec<(u32, String)> = (first..first + size).map(|r| (r, format!("P{r}"))).collect();
    let rows: Vec<(u32, &str, bool)> = names.iter().map(|(r, n)| (*r, n.as_str(), false)).collect();
    osrs_page(&rows)
}

/// 1234567 → "1,234,567"
pub fn group(n: u32) -> String {
    let s = n.to_string();
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
