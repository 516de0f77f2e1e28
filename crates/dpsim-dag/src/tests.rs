use crate::dag::DAG;
use crate::scheduler::{Assignment, Scheduler};
use crate::schedulers::common::{best_fit, score, WorkerPool};
use crate::schedulers::locality::LocalityScheduler;
use crate::schedulers::map_reduce::MapReduceScheduler;
use crate::schedulers::map_reduce_flow::MapReduceFlowScheduler;
use crate::schedulers::simple_queue::SimpleQueueScheduler;
use crate::task::*;
use crate::worker::{uniform_workers, Worker};

fn all_schedulers() -> Vec<Box<dyn Scheduler>> {
    vec![
        Box::new(SimpleQueueScheduler::new()),
        Box::new(MapReduceScheduler::new()),
        Box::new(MapReduceFlowScheduler::default()),
        Box::new(LocalityScheduler::new()),
    ]
}

fn one_task_of_each_kind() -> (DAG, [usize; 4]) {
    let mut dag = DAG::new();
    let other = dag.add_task("other", TaskKind::Other);
    let reduce = dag.add_reduce_task("reduce");
    let map = dag.add_map_task("map", 1.);
    let shuffle = dag.add_shuffle_task("shuffle");
    (dag, [shuffle, map, reduce, other])
}

fn complete_on(dag: &mut DAG, workers: &mut [Worker], task_id: usize, worker_id: usize) {
    dag.update_task_state(task_id, TaskState::NeedInput);
    dag.update_task_state(task_id, TaskState::Computing);
    dag.update_task_state(task_id, TaskState::Completed);
    dag.get_task_mut(task_id).worker = Some(worker_id);
    workers[worker_id].task = None;
}

fn run_on(dag: &mut DAG, workers: &mut [Worker], task_id: usize, worker_id: usize) {
    dag.update_task_state(task_id, TaskState::NeedInput);
    dag.get_task_mut(task_id).worker = Some(worker_id);
    workers[worker_id].task = Some(task_id);
}

#[test]
fn score_and_best_fit() {
    let task = Task::new("t", TaskKind::Other).with_memory(4);
    let mut workers = uniform_workers(4, 1., 8);
    workers[0].failed = true;
    workers[1].task = Some(7);
    workers[2].memory = 2;
    assert_eq!(score(&task, &workers[0]), -1);
    assert_eq!(score(&task, &workers[1]), -1);
    assert_eq!(score(&task, &workers[2]), -1);
    assert_eq!(score(&task, &workers[3]), 1);
    assert_eq!(best_fit(&task, 0..4, &workers), Some(3));
    assert_eq!(best_fit(&task, 0..3, &workers), None);
}

#[test]
fn worker_pool_snapshot() {
    let mut workers = uniform_workers(4, 1., 1);
    workers[1].failed = true;
    workers[2].task = Some(0);
    let mut pool = WorkerPool::snapshot(&workers);
    assert_eq!(pool.len(), 2);
    assert!(pool.contains(0) && pool.contains(3));
    assert!(pool.take(0));
    assert!(!pool.take(0));
    assert!(!pool.is_empty());
}

#[test]
fn simple_queue_in_task_order() {
    let (dag, [shuffle, map, reduce, other]) = one_task_of_each_kind();
    let workers = uniform_workers(3, 1., 1);
    let assignments = SimpleQueueScheduler::new().schedule(&dag, &workers, &[], &[]);
    assert_eq!(
        assignments,
        vec![
            Assignment::new(other, 0),
            Assignment::new(reduce, 1),
            Assignment::new(map, 2)
        ]
    );
    assert!(!assignments.iter().any(|a| a.task == shuffle));
}

#[test]
fn phase_priority_with_single_worker() {
    let (dag, [shuffle, ..]) = one_task_of_each_kind();
    let workers = uniform_workers(1, 1., 1);
    let assignments = MapReduceScheduler::new().schedule(&dag, &workers, &[], &[]);
    assert_eq!(assignments, vec![Assignment::new(shuffle, 0)]);
}

#[test]
fn phase_order() {
    let (dag, order) = one_task_of_each_kind();
    let workers = uniform_workers(4, 1., 1);
    for scheduler in [
        Box::new(MapReduceScheduler::new()) as Box<dyn Scheduler>,
        Box::new(MapReduceFlowScheduler::default()) as Box<dyn Scheduler>,
    ] {
        let tasks = scheduler
            .schedule(&dag, &workers, &[], &[])
            .iter()
            .map(|a| a.task)
            .collect::<Vec<_>>();
        assert_eq!(tasks, order.to_vec());
    }
}

#[test]
fn shuffle_limit() {
    let mut dag = DAG::new();
    let s1 = dag.add_shuffle_task("s1");
    let s2 = dag.add_shuffle_task("s2");
    let map = dag.add_map_task("map", 1.);
    let mut workers = uniform_workers(3, 1., 1);
    let scheduler = MapReduceFlowScheduler::new(1, 100);

    let assignments = scheduler.schedule(&dag, &workers, &[], &[]);
    assert_eq!(assignments, vec![Assignment::new(s1, 0), Assignment::new(map, 1)]);

    // a running shuffle task uses up the limit
    run_on(&mut dag, &mut workers, s1, 0);
    let assignments = scheduler.schedule(&dag, &workers, &[], &[]);
    assert_eq!(assignments, vec![Assignment::new(map, 1)]);
    assert!(!assignments.iter().any(|a| a.task == s2));
}

#[test]
fn reduce_limit() {
    let mut dag = DAG::new();
    let reduces = (0..4).map(|i| dag.add_reduce_task(&format!("r{}", i))).collect::<Vec<_>>();
    let workers = uniform_workers(4, 1., 1);
    let assignments = MapReduceFlowScheduler::new(100, 2).schedule(&dag, &workers, &[], &[]);
    assert_eq!(
        assignments,
        vec![Assignment::new(reduces[0], 0), Assignment::new(reduces[1], 1)]
    );
}

#[test]
fn repeated_calls_are_idempotent() {
    let mut dag = DAG::new();
    let map = dag.add_map_task("map", 1.);
    let shuffle = dag.add_shuffle_task("shuffle");
    let reduce = dag.add_reduce_task("reduce");
    dag.add_edge(map, shuffle);
    dag.add_edge(shuffle, reduce);
    let extra = dag.add_map_task("extra", 1.);
    let mut workers = uniform_workers(3, 1., 1);
    complete_on(&mut dag, &mut workers, map, 2);

    for scheduler in all_schedulers() {
        let first = scheduler.schedule(&dag, &workers, &[map], &[]);
        let second = scheduler.schedule(&dag, &workers, &[map], &[]);
        assert_eq!(first, second);
        assert!(!first.is_empty());
        assert!(first.iter().all(|a| a.task != map));
        assert!(first.iter().any(|a| a.task == extra));
    }
}

#[test]
fn no_duplicates_in_output() {
    let mut dag = DAG::new();
    let a = dag.add_task("a", TaskKind::Other);
    for i in 0..5 {
        let succ = dag.add_task(&format!("succ{}", i), TaskKind::Other);
        dag.add_edge(a, succ);
    }
    let mut workers = uniform_workers(3, 1., 1);
    complete_on(&mut dag, &mut workers, a, 1);

    for scheduler in all_schedulers() {
        let assignments = scheduler.schedule(&dag, &workers, &[a], &[]);
        assert_eq!(assignments.len(), 3);
        let mut tasks = assignments.iter().map(|a| a.task).collect::<Vec<_>>();
        let mut used = assignments.iter().map(|a| a.worker).collect::<Vec<_>>();
        tasks.sort();
        tasks.dedup();
        used.sort();
        used.dedup();
        assert_eq!(tasks.len(), 3);
        assert_eq!(used, vec![0, 1, 2]);
    }
}

#[test]
fn locality_reuses_vacated_worker() {
    let mut dag = DAG::new();
    let early = dag.add_task("early", TaskKind::Other);
    let producer = dag.add_task("producer", TaskKind::Other);
    let consumer = dag.add_task("consumer", TaskKind::Other);
    dag.add_edge(producer, consumer);
    let mut workers = uniform_workers(3, 1., 1);
    complete_on(&mut dag, &mut workers, producer, 2);

    let assignments = LocalityScheduler::new().schedule(&dag, &workers, &[producer], &[]);
    assert_eq!(
        assignments,
        vec![Assignment::new(consumer, 2), Assignment::new(early, 0)]
    );

    // without locality the consumer would go to the first free worker
    let assignments = SimpleQueueScheduler::new().schedule(&dag, &workers, &[producer], &[]);
    assert_eq!(
        assignments,
        vec![Assignment::new(early, 0), Assignment::new(consumer, 1)]
    );
}

#[test]
fn locality_in_completion_order() {
    let mut dag = DAG::new();
    let p1 = dag.add_task("p1", TaskKind::Other);
    let p2 = dag.add_task("p2", TaskKind::Other);
    let join = dag.add_task("join", TaskKind::Other);
    let tail = dag.add_task("tail", TaskKind::Other);
    dag.add_edge(p1, join);
    dag.add_edge(p2, join);
    dag.add_edge(p2, tail);
    let mut workers = uniform_workers(2, 1., 1);
    complete_on(&mut dag, &mut workers, p1, 0);
    complete_on(&mut dag, &mut workers, p2, 1);

    let assignments = LocalityScheduler::new().schedule(&dag, &workers, &[p2, p1], &[]);
    assert_eq!(assignments, vec![Assignment::new(join, 1), Assignment::new(tail, 0)]);
}

#[test]
fn locality_skips_failed_worker() {
    let mut dag = DAG::new();
    let producer = dag.add_task("producer", TaskKind::Other);
    let consumer = dag.add_task("consumer", TaskKind::Other);
    dag.add_edge(producer, consumer);
    let mut workers = uniform_workers(2, 1., 1);
    complete_on(&mut dag, &mut workers, producer, 1);
    workers[1].failed = true;

    let assignments = LocalityScheduler::new().schedule(&dag, &workers, &[producer], &[]);
    assert_eq!(assignments, vec![Assignment::new(consumer, 0)]);
}

#[test]
fn unsuitable_workers_defer_tasks() {
    let mut dag = DAG::new();
    let big = dag.add_task("big", TaskKind::Map);
    dag.set_memory(big, 64);
    let small = dag.add_task("small", TaskKind::Map);
    let workers = uniform_workers(2, 1., 16);
    for scheduler in all_schedulers() {
        let assignments = scheduler.schedule(&dag, &workers, &[], &[]);
        assert_eq!(assignments, vec![Assignment::new(small, 0)]);
    }
}
