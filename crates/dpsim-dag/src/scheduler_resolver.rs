//! Resolving schedulers by name.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::str::FromStr;

use itertools::Itertools;

use crate::scheduler::Scheduler;
use crate::schedulers::locality::LocalityScheduler;
use crate::schedulers::map_reduce::MapReduceScheduler;
use crate::schedulers::map_reduce_flow::MapReduceFlowScheduler;
use crate::schedulers::simple_queue::SimpleQueueScheduler;

/// Scheduler name with optional parameters, written as `Name` or `Name[key=value,key=value]`.
#[derive(Debug, Clone)]
pub struct SchedulerParams {
    name: String,
    params: BTreeMap<String, String>,
}

impl SchedulerParams {
    pub fn from_str(s: &str) -> Option<Self> {
        let open = match s.find('[') {
            Some(open) => open,
            None => {
                return Some(Self {
                    name: s.to_string(),
                    params: BTreeMap::new(),
                })
            }
        };
        if !s.ends_with(']') {
            return None;
        }

        let mut params = BTreeMap::new();
        let inner = &s[open + 1..s.len() - 1];
        if !inner.is_empty() {
            for param in inner.split(',') {
                let pos = param.find('=')?;
                params.insert(param[..pos].trim().to_string(), param[pos + 1..].trim().to_string());
            }
        }

        Some(Self {
            name: s[..open].to_string(),
            params,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get<T: FromStr, K: AsRef<str>>(&self, name: K) -> Option<T> {
        self.params.get(name.as_ref()).and_then(|s| s.parse().ok())
    }
}

impl std::fmt::Display for SchedulerParams {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(
                f,
                "{}[{}]",
                self.name,
                self.params.iter().map(|(k, v)| format!("{k}={v}")).join(",")
            )
        }
    }
}

pub fn default_scheduler_resolver(params: &SchedulerParams) -> Option<Rc<dyn Scheduler>> {
    match params.name.as_ref() {
        "SimpleQueue" => Some(Rc::new(SimpleQueueScheduler::new())),
        "MapReduce" => Some(Rc::new(MapReduceScheduler::new())),
        "MapReduceFlow" => Some(Rc::new(MapReduceFlowScheduler::from_scheduler_params(params))),
        "Locality" | "Dask" => Some(Rc::new(LocalityScheduler::new())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_name() {
        let params = SchedulerParams::from_str("MapReduce").unwrap();
        assert_eq!(params.name(), "MapReduce");
        assert_eq!(params.get::<usize, _>("max_shuffle"), None);
        assert_eq!(params.to_string(), "MapReduce");
    }

    #[test]
    fn parse_params() {
        let params = SchedulerParams::from_str("MapReduceFlow[max_shuffle=1,max_reduce=4]").unwrap();
        assert_eq!(params.name(), "MapReduceFlow");
        assert_eq!(params.get::<usize, _>("max_shuffle"), Some(1));
        assert_eq!(params.get::<usize, _>("max_reduce"), Some(4));
        assert_eq!(params.to_string(), "MapReduceFlow[max_reduce=4,max_shuffle=1]");
    }

    #[test]
    fn malformed_params() {
        assert!(SchedulerParams::from_str("MapReduceFlow[max_shuffle=1").is_none());
        assert!(SchedulerParams::from_str("MapReduceFlow[max_shuffle]").is_none());
    }

    #[test]
    fn resolve_names() {
        for name in ["SimpleQueue", "MapReduce", "MapReduceFlow[max_shuffle=2]", "Locality", "Dask"] {
            let params = SchedulerParams::from_str(name).unwrap();
            assert!(default_scheduler_resolver(&params).is_some(), "{}", name);
        }
        let params = SchedulerParams::from_str("Heft").unwrap();
        assert!(default_scheduler_resolver(&params).is_none());
    }
}
