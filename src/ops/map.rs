//! Map operator: transforms each value with a closure.

use crate::{
  complete_proxy_impl, error_proxy_impl, is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct MapOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F, B> Signal for MapOp<S, F>
where
  S: Signal,
  F: FnMut(S::Item) -> B + Send + 'static,
  B: Send + 'static,
{
  type Item = B;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<B, S::Err> + Send + 'static,
  {
    let MapOp { source, func } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber { observer: MapObserver { observer, func }, cancel });
  }
}

pub struct MapObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, Err, B, O, F> Observer<Item, Err> for MapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> B,
{
  fn next(&mut self, value: Item) {
    let mapped = (self.func)(value);
    self.observer.next(mapped);
  }

  error_proxy_impl!(Err, observer);
  complete_proxy_impl!(observer);
  is_closed_proxy_impl!(observer);
}

#[cfg(test)]
mod test {
  use bencher::benchmark_group;

  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn doubles_each_value() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter([1, 2, 3])
      .map(|v| v * 2)
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![2, 4, 6]);
  }

  #[test]
  fn changes_the_element_type() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter(["a", "bb", "ccc"])
      .map(str::len)
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![1, 2, 3]);
  }

  #[test]
  fn failures_pass_through() {
    let got = Arc::new(Mutex::new(None));
    let c_got = got.clone();

    signal::throw::<i32, _>("boom")
      .map(|v| v * 2)
      .on_error(move |e| *c_got.lock().unwrap() = Some(e))
      .subscribe(|_| {});

    assert_eq!(*got.lock().unwrap(), Some("boom"));
  }

  #[test]
  fn bench() { do_bench(); }

  benchmark_group!(do_bench, bench_map);

  fn bench_map(b: &mut bencher::Bencher) { b.iter(doubles_each_value); }
}
