use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use log::{debug, info};

/// 数据报来源，`recv` 阻塞直到有数据报到达
pub trait DatagramSource {
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// 释放网络资源
    fn close(&mut self) {}
}

/// 绑定在本地地址上的 UDP 数据报来源
#[derive(Debug)]
pub struct UdpSource {
    socket: Option<UdpSocket>,
    local_addr: SocketAddr,
}

impl UdpSource {
    pub fn bind(addr: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        let local_addr = socket.local_addr()?;
        info!("Listening for telemetry on {}", local_addr);
        Ok(Self {
            socket: Some(socket),
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// 用于从其他线程唤醒阻塞中的 `recv`
    pub fn waker(&self) -> SocketWaker {
        SocketWaker::new(self.local_addr)
    }
}

impl DatagramSource for UdpSource {
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &self.socket {
            Some(socket) => socket.recv_from(buf).map(|(len, _peer)| len),
            None => Err(io::Error::new(io::ErrorKind::NotConnected, "socket already closed")),
        }
    }

    fn close(&mut self) {
        if self.socket.take().is_some() {
            info!("Released UDP socket {}", self.local_addr);
        }
    }
}

/// 向监听地址发送一个空数据报，让阻塞的接收返回
///
/// 空数据报长度不符，会被当作格式错误直接丢弃。
#[derive(Debug, Clone, Copy)]
pub struct SocketWaker {
    target: SocketAddr,
}

impl SocketWaker {
    pub fn new(listen_addr: SocketAddr) -> Self {
        let mut target = listen_addr;
        if target.ip().is_unspecified() {
            target.set_ip(match target.ip() {
                IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
            });
        }
        Self { target }
    }

    pub fn wake(&self) -> io::Result<()> {
        let bind_addr: SocketAddr = match self.target {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(bind_addr)?;
        socket.send_to(&[], self.target)?;
        debug!("Sent wake-up datagram to {}", self.target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waker_targets_loopback_for_wildcard_bind() {
        let waker = SocketWaker::new("0.0.0.0:8080".parse().unwrap());
        assert_eq!(waker.target, "127.0.0.1:8080".parse().unwrap());

        let waker = SocketWaker::new("192.168.1.10:9000".parse().unwrap());
        assert_eq!(waker.target, "192.168.1.10:9000".parse().unwrap());
    }

    #[test]
    fn receives_datagram_over_loopback() {
        let mut source = UdpSource::bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        sender.send_to(&[7u8; 88], source.local_addr()).unwrap();

        let mut buf = [0u8; 1024];
        let len = source.recv(&mut buf).unwrap();
        assert_eq!(len, 88);
        assert_eq!(buf[0], 7);
    }

    #[test]
    fn wake_delivers_empty_datagram() {
        let mut source = UdpSource::bind("127.0.0.1:0".parse().unwrap()).unwrap();
        source.waker().wake().unwrap();

        let mut buf = [0u8; 1024];
        assert_eq!(source.recv(&mut buf).unwrap(), 0);
    }

    #[test]
    fn recv_after_close_fails() {
        let mut source = UdpSource::bind("127.0.0.1:0".parse().unwrap()).unwrap();
        source.close();

        let mut buf = [0u8; 16];
        let err = source.recv(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
    }
}
