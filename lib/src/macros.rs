/// Generates `From` conversions into a local error enum.
///
/// The source error is kept as its rendered message.
macro_rules! error_convert_from {
  (@impl $from_type:ty, $to_type:ident, $tgt:ident, display) => {
    impl From<$from_type> for $to_type {
      fn from(error: $from_type) -> Self {
        $to_type::$tgt(format!("{}", error))
      }
    }
  };
  ($($from_type:ty => $to_type:ident :: $tgt:ident ($mode:ident)),+ $(,)?) => {
    $(error_convert_from!(@impl $from_type, $to_type, $tgt, $mode);)+
  };
}
