mod test_dispatch;
